use std::collections::HashMap;

use async_trait::async_trait;
use log::{info, warn};
use redis::AsyncCommands;
use roster_core::types::{NewPlayer, Player, Profession, Race};

use crate::error::StoreError;
use crate::store::PlayerStore;

const NEXT_ID_KEY: &str = "player:next_id";
/// Sorted set of every player id, scored by the id itself.
const PLAYERS_INDEX_KEY: &str = "players";

fn player_key(id: i64) -> String {
    format!("player:{}", id)
}

/// Player store backed by KeyDB hashes (`player:{id}`) plus an id index.
#[derive(Clone)]
pub struct KeyDbPlayerStore {
    con: redis::aio::MultiplexedConnection,
}

impl KeyDbPlayerStore {
    pub fn new(con: redis::aio::MultiplexedConnection) -> Self {
        Self { con }
    }

    /// Writes the player hash and its index entry in one atomic pipeline.
    ///
    /// Level fields are stored for readability only; they are recomputed from
    /// `experience` whenever a hash is loaded.
    async fn write_player(&self, player: &Player) -> Result<(), StoreError> {
        let mut con = self.con.clone();
        let key = player_key(player.id);

        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("HSET")
            .arg(&key)
            .arg("name")
            .arg(&player.name)
            .arg("title")
            .arg(&player.title)
            .arg("race")
            .arg(player.race.as_str())
            .arg("profession")
            .arg(player.profession.as_str())
            .arg("birthday")
            .arg(player.birthday)
            .arg("banned")
            .arg(i32::from(player.banned))
            .arg("experience")
            .arg(player.experience())
            .arg("level")
            .arg(player.level())
            .arg("until_next_level")
            .arg(player.until_next_level())
            .cmd("ZADD")
            .arg(PLAYERS_INDEX_KEY)
            .arg(player.id)
            .arg(player.id);

        pipe.query_async(&mut con)
            .await
            .map(|_: Vec<redis::Value>| ())
            .map_err(StoreError::from)
    }
}

fn field<'a>(
    id: i64,
    hash: &'a HashMap<String, String>,
    name: &str,
) -> Result<&'a str, StoreError> {
    hash.get(name)
        .map(String::as_str)
        .ok_or_else(|| StoreError::Corrupt {
            id,
            reason: format!("missing {}", name),
        })
}

fn parsed_field<T: std::str::FromStr>(
    id: i64,
    hash: &HashMap<String, String>,
    name: &str,
) -> Result<T, StoreError> {
    field(id, hash, name)?
        .parse()
        .map_err(|_| StoreError::Corrupt {
            id,
            reason: format!("invalid {}", name),
        })
}

/// Decodes a `player:{id}` hash as returned by `HGETALL`.
///
/// # Returns
/// * `Ok(None)` if the hash is empty (the key does not exist).
/// * `Ok(Some(Player))` with derived fields recomputed from the stored experience.
/// * `Err(StoreError::Corrupt)` if a field is missing or unparseable.
pub(crate) fn player_from_hash(
    id: i64,
    hash: &HashMap<String, String>,
) -> Result<Option<Player>, StoreError> {
    if hash.is_empty() {
        return Ok(None);
    }

    let race = Race::from_name(field(id, hash, "race")?).ok_or_else(|| StoreError::Corrupt {
        id,
        reason: "unknown race".to_string(),
    })?;
    let profession = Profession::from_name(field(id, hash, "profession")?).ok_or_else(|| {
        StoreError::Corrupt {
            id,
            reason: "unknown profession".to_string(),
        }
    })?;
    let banned: i32 = parsed_field(id, hash, "banned")?;

    let new_player = NewPlayer {
        name: field(id, hash, "name")?.to_string(),
        title: field(id, hash, "title")?.to_string(),
        race,
        profession,
        birthday: parsed_field(id, hash, "birthday")?,
        banned: banned != 0,
        experience: parsed_field(id, hash, "experience")?,
    };

    Ok(Some(Player::from_new(id, new_player)))
}

#[async_trait]
impl PlayerStore for KeyDbPlayerStore {
    async fn insert(&self, new_player: NewPlayer) -> Result<Player, StoreError> {
        let mut con = self.con.clone();
        let id: i64 = con.incr(NEXT_ID_KEY, 1).await?;
        let player = Player::from_new(id, new_player);
        self.write_player(&player).await?;
        info!("Inserted player hash {}", player_key(id));
        Ok(player)
    }

    async fn find(&self, id: i64) -> Result<Option<Player>, StoreError> {
        let mut con = self.con.clone();
        let hash: HashMap<String, String> = con.hgetall(player_key(id)).await?;
        player_from_hash(id, &hash)
    }

    async fn exists(&self, id: i64) -> Result<bool, StoreError> {
        let mut con = self.con.clone();
        let exists: bool = con.exists(player_key(id)).await?;
        Ok(exists)
    }

    async fn save(&self, player: &Player) -> Result<(), StoreError> {
        self.write_player(player).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut con = self.con.clone();

        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("DEL")
            .arg(player_key(id))
            .cmd("ZREM")
            .arg(PLAYERS_INDEX_KEY)
            .arg(id);

        pipe.query_async(&mut con)
            .await
            .map(|_: Vec<redis::Value>| ())
            .map_err(StoreError::from)
    }

    async fn all(&self) -> Result<Vec<Player>, StoreError> {
        let mut con = self.con.clone();
        let ids: Vec<i64> = con.zrange(PLAYERS_INDEX_KEY, 0, -1).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut pipe = redis::pipe();
        for id in &ids {
            pipe.cmd("HGETALL").arg(player_key(*id));
        }
        let hashes: Vec<HashMap<String, String>> = pipe.query_async(&mut con).await?;

        let mut players = Vec::with_capacity(ids.len());
        for (id, hash) in ids.into_iter().zip(hashes.iter()) {
            match player_from_hash(id, hash)? {
                Some(player) => players.push(player),
                // Deleted between the index read and the hash reads.
                None => warn!("Player {} is indexed but has no hash", id),
            }
        }

        Ok(players)
    }
}
