//! Translates listing query parameters into predicates, an ordering and a page.

use std::cmp::Ordering;
use std::str::FromStr;

use log::debug;

use crate::types::{Player, PlayerOrder, Profession, Race};

pub const DEFAULT_PAGE_NUMBER: i32 = 0;
pub const DEFAULT_PAGE_SIZE: i32 = 3;

/// Optional constraints of `GET /players` and `GET /players/count`.
///
/// Every bound is exclusive: `min_experience = Some(1000)` keeps players with
/// strictly more than 1000 experience.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFilter {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    /// Birthday lower bound in epoch milliseconds.
    pub after: Option<i64>,
    /// Birthday upper bound in epoch milliseconds.
    pub before: Option<i64>,
    pub banned: Option<bool>,
    pub min_experience: Option<i32>,
    pub max_experience: Option<i32>,
    pub min_level: Option<i32>,
    pub max_level: Option<i32>,
    pub order: Option<PlayerOrder>,
    pub page_number: Option<i32>,
    pub page_size: Option<i32>,
}

fn parse_or_skip<T: FromStr>(key: &str, value: &str) -> Option<T> {
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        debug!("Ignoring malformed filter value {}={:?}", key, value);
    }
    parsed
}

fn name_or_skip<T>(key: &str, value: &str, from_name: fn(&str) -> Option<T>) -> Option<T> {
    let parsed = from_name(value.trim());
    if parsed.is_none() {
        debug!("Ignoring unknown filter value {}={:?}", key, value);
    }
    parsed
}

impl PlayerFilter {
    /// Builds a filter from raw query-string pairs.
    ///
    /// Parsing is lenient: unknown keys and values that fail to parse are
    /// dropped, so they do not constrain the result.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = PlayerFilter::default();

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "name" => filter.name = Some(value.to_string()),
                "title" => filter.title = Some(value.to_string()),
                "race" => filter.race = name_or_skip(key, value, Race::from_name),
                "profession" => {
                    filter.profession = name_or_skip(key, value, Profession::from_name)
                }
                "order" => filter.order = name_or_skip(key, value, PlayerOrder::from_name),
                "after" => filter.after = parse_or_skip(key, value),
                "before" => filter.before = parse_or_skip(key, value),
                "banned" => filter.banned = parse_or_skip(key, value),
                "minExperience" => filter.min_experience = parse_or_skip(key, value),
                "maxExperience" => filter.max_experience = parse_or_skip(key, value),
                "minLevel" => filter.min_level = parse_or_skip(key, value),
                "maxLevel" => filter.max_level = parse_or_skip(key, value),
                "pageNumber" => filter.page_number = parse_or_skip(key, value),
                "pageSize" => filter.page_size = parse_or_skip(key, value),
                _ => debug!("Ignoring unknown filter parameter {}", key),
            }
        }

        filter
    }

    pub fn page(&self) -> Page {
        Page::new(self.page_number, self.page_size)
    }
}

/// Offset/limit window over a filtered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub size: usize,
}

impl Page {
    /// Negative page numbers are clamped to 0; page sizes below 1 fall back to
    /// [`DEFAULT_PAGE_SIZE`].
    pub fn new(number: Option<i32>, size: Option<i32>) -> Self {
        let number = number.unwrap_or(DEFAULT_PAGE_NUMBER).max(0);
        let size = size.filter(|size| *size > 0).unwrap_or(DEFAULT_PAGE_SIZE);
        Self {
            number: number as usize,
            size: size as usize,
        }
    }

    pub fn offset(&self) -> usize {
        self.number.saturating_mul(self.size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

type Predicate = Box<dyn Fn(&Player) -> bool + Send + Sync>;

fn predicate<T>(
    value: &Option<T>,
    test: impl Fn(&Player, &T) -> bool + Send + Sync + 'static,
) -> Option<Predicate>
where
    T: Clone + Send + Sync + 'static,
{
    value
        .clone()
        .map(|value| Box::new(move |player: &Player| test(player, &value)) as Predicate)
}

/// Conjunction of the constraints present in a [`PlayerFilter`] plus a sort key.
pub struct PlayerQuery {
    predicates: Vec<Predicate>,
    order: PlayerOrder,
}

impl PlayerQuery {
    pub fn from_filter(filter: &PlayerFilter) -> Self {
        let candidates = [
            predicate(&filter.name, |p, name: &String| p.name.contains(name.as_str())),
            predicate(&filter.title, |p, title: &String| {
                p.title.contains(title.as_str())
            }),
            predicate(&filter.race, |p, race| p.race == *race),
            predicate(&filter.profession, |p, profession| {
                p.profession == *profession
            }),
            predicate(&filter.after, |p, after| p.birthday > *after),
            predicate(&filter.before, |p, before| p.birthday < *before),
            predicate(&filter.banned, |p, banned| p.banned == *banned),
            predicate(&filter.min_experience, |p, min| p.experience() > *min),
            predicate(&filter.max_experience, |p, max| p.experience() < *max),
            predicate(&filter.min_level, |p, min| p.level() > *min),
            predicate(&filter.max_level, |p, max| p.level() < *max),
        ];

        Self {
            predicates: candidates.into_iter().flatten().collect(),
            order: filter.order.unwrap_or_default(),
        }
    }

    /// Number of active constraints.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn order(&self) -> PlayerOrder {
        self.order
    }

    pub fn matches(&self, player: &Player) -> bool {
        self.predicates.iter().all(|predicate| predicate(player))
    }

    pub fn count<'a>(&self, players: impl IntoIterator<Item = &'a Player>) -> usize {
        players
            .into_iter()
            .filter(|player| self.matches(player))
            .count()
    }

    /// Filters, sorts ascending by the order key and cuts out `page`.
    ///
    /// Sorting is stable and players with equal keys stay in id order.
    pub fn page(&self, players: impl IntoIterator<Item = Player>, page: Page) -> Vec<Player> {
        let mut matching: Vec<Player> = players
            .into_iter()
            .filter(|player| self.matches(player))
            .collect();

        matching.sort_by(|a, b| compare_by(self.order, a, b).then(a.id.cmp(&b.id)));

        matching
            .into_iter()
            .skip(page.offset())
            .take(page.size)
            .collect()
    }
}

fn compare_by(order: PlayerOrder, a: &Player, b: &Player) -> Ordering {
    match order {
        PlayerOrder::Id => a.id.cmp(&b.id),
        PlayerOrder::Name => a.name.cmp(&b.name),
        PlayerOrder::Experience => a.experience().cmp(&b.experience()),
        PlayerOrder::Birthday => a.birthday.cmp(&b.birthday),
        PlayerOrder::Level => a.level().cmp(&b.level()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewPlayer;

    const Y2K: i64 = 946_684_800_000;
    const DAY: i64 = 86_400_000;

    fn player(id: i64, name: &str, race: Race, experience: i32, birthday: i64) -> Player {
        Player::from_new(
            id,
            NewPlayer {
                name: name.to_string(),
                title: format!("Title of {name}"),
                race,
                profession: if id % 2 == 0 {
                    Profession::Warrior
                } else {
                    Profession::Druid
                },
                birthday,
                banned: id % 3 == 0,
                experience,
            },
        )
    }

    fn roster() -> Vec<Player> {
        vec![
            player(1, "Zed", Race::Human, 1000, Y2K + 5 * DAY),
            player(2, "Amy", Race::Elf, 1500, Y2K + DAY),
            player(3, "Bob", Race::Human, 2000, Y2K + 3 * DAY),
            player(4, "Cid", Race::Orc, 0, Y2K + 2 * DAY),
            player(5, "Bobby", Race::Human, 1999, Y2K + 4 * DAY),
        ]
    }

    fn ids(players: &[Player]) -> Vec<i64> {
        players.iter().map(|player| player.id).collect()
    }

    #[test]
    fn empty_filter_has_no_predicates_and_matches_everything() {
        let query = PlayerQuery::from_filter(&PlayerFilter::default());
        assert!(query.is_empty());
        assert_eq!(query.count(&roster()), 5);
    }

    #[test]
    fn experience_bounds_are_exclusive() {
        let filter = PlayerFilter {
            min_experience: Some(1000),
            max_experience: Some(2000),
            ..Default::default()
        };
        let query = PlayerQuery::from_filter(&filter);
        assert_eq!(query.len(), 2);

        let page = query.page(roster(), Page::new(None, Some(100)));
        assert_eq!(ids(&page), vec![2, 5]);
    }

    #[test]
    fn birthday_bounds_are_exclusive() {
        let filter = PlayerFilter {
            after: Some(Y2K + DAY),
            before: Some(Y2K + 5 * DAY),
            ..Default::default()
        };
        let query = PlayerQuery::from_filter(&filter);
        assert_eq!(ids(&query.page(roster(), Page::new(None, Some(10)))), vec![3, 4, 5]);
    }

    #[test]
    fn name_is_case_sensitive_substring() {
        let filter = PlayerFilter {
            name: Some("Bob".to_string()),
            ..Default::default()
        };
        assert_eq!(PlayerQuery::from_filter(&filter).count(&roster()), 2);

        let filter = PlayerFilter {
            name: Some("bob".to_string()),
            ..Default::default()
        };
        assert_eq!(PlayerQuery::from_filter(&filter).count(&roster()), 0);
    }

    #[test]
    fn filters_are_combined_with_and() {
        let filter = PlayerFilter {
            race: Some(Race::Human),
            banned: Some(false),
            profession: Some(Profession::Druid),
            ..Default::default()
        };
        let query = PlayerQuery::from_filter(&filter);
        assert_eq!(ids(&query.page(roster(), Page::default())), vec![1, 5]);
    }

    #[test]
    fn level_bounds_use_derived_level() {
        // Levels by id: 1 -> 4, 2 -> 5, 3 -> 5, 4 -> 0, 5 -> 5
        let filter = PlayerFilter {
            min_level: Some(4),
            ..Default::default()
        };
        assert_eq!(PlayerQuery::from_filter(&filter).count(&roster()), 3);

        let filter = PlayerFilter {
            max_level: Some(4),
            ..Default::default()
        };
        assert_eq!(PlayerQuery::from_filter(&filter).count(&roster()), 1);
    }

    #[test]
    fn default_page_is_first_three_by_id() {
        let query = PlayerQuery::from_filter(&PlayerFilter::default());
        assert_eq!(ids(&query.page(roster(), Page::default())), vec![1, 2, 3]);
        assert_eq!(ids(&query.page(roster(), Page::new(Some(1), None))), vec![4, 5]);
        assert!(query.page(roster(), Page::new(Some(2), None)).is_empty());
    }

    #[test]
    fn orders_ascending_by_requested_field() {
        let cases = [
            (PlayerOrder::Name, vec![2, 3, 5, 4, 1]),
            (PlayerOrder::Experience, vec![4, 1, 2, 5, 3]),
            (PlayerOrder::Birthday, vec![2, 4, 3, 5, 1]),
            (PlayerOrder::Level, vec![4, 1, 2, 3, 5]),
            (PlayerOrder::Id, vec![1, 2, 3, 4, 5]),
        ];

        for (order, expected) in cases {
            let filter = PlayerFilter {
                order: Some(order),
                page_size: Some(10),
                ..Default::default()
            };
            let query = PlayerQuery::from_filter(&filter);
            assert_eq!(ids(&query.page(roster(), filter.page())), expected, "{order:?}");
        }
    }

    #[test]
    fn count_equals_unpaginated_listing_length() {
        let filter = PlayerFilter {
            race: Some(Race::Human),
            ..Default::default()
        };
        let query = PlayerQuery::from_filter(&filter);
        let listed = query.page(roster(), Page::new(Some(0), Some(i32::MAX)));
        assert_eq!(query.count(&roster()), listed.len());
    }

    #[test]
    fn page_clamps_negative_number_and_non_positive_size() {
        assert_eq!(Page::new(Some(-4), Some(5)), Page { number: 0, size: 5 });
        assert_eq!(Page::new(None, Some(0)), Page { number: 0, size: 3 });
        assert_eq!(Page::new(Some(2), Some(-1)).offset(), 6);
    }

    #[test]
    fn query_pairs_are_parsed_leniently() {
        let filter = PlayerFilter::from_query_pairs([
            ("name", "Bo"),
            ("race", "HUMAN"),
            ("profession", "BARD"),
            ("minExperience", "abc"),
            ("maxLevel", "7"),
            ("banned", "true"),
            ("order", "EXPERIENCE"),
            ("pageNumber", "2"),
            ("pageSize", "5"),
            ("unknown", "1"),
        ]);

        assert_eq!(
            filter,
            PlayerFilter {
                name: Some("Bo".to_string()),
                race: Some(Race::Human),
                max_level: Some(7),
                banned: Some(true),
                order: Some(PlayerOrder::Experience),
                page_number: Some(2),
                page_size: Some(5),
                ..Default::default()
            }
        );
    }
}
