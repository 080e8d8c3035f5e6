pub mod browse;
pub mod config;
pub mod list;
pub mod spinner;

use cinestream_models::{ItemKey, MediaType};
use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;

/// Resolve `<type> <id>` or a single `movie-550` style key
pub fn parse_target(args: &[String]) -> Result<ItemKey> {
    match args {
        [key] => key
            .parse::<ItemKey>()
            .map_err(|_| eyre!("'{}' is not a title key; expected something like movie-550 or tv-1399", key)),
        [media_type, id] => {
            let media_type = media_type
                .parse::<MediaType>()
                .map_err(|e| eyre!("{}", e))?;
            let id = id
                .parse::<u64>()
                .map_err(|_| eyre!("'{}' is not a numeric catalog id", id))?;
            Ok(ItemKey::new(id, media_type))
        }
        [] => bail!("Missing title: pass <type> <id> (e.g. movie 550) or a key like movie-550"),
        _ => bail!("Too many arguments: pass <type> <id> or a single key"),
    }
}
