use crate::error::StoreError;
use crate::store::{MazeRecord, MazeStore};

/// Starter mazes seeded into an empty store, in display order.
pub const DEFAULT_MAZES: [(&str, &str); 5] = [
    (
        "1. Easy (8x8)",
        concat!(
            ".................\n",
            ".           .   .\n",
            ". ... ..... . ...\n",
            ". . . .     .   .\n",
            "... . . . ... . .\n",
            ".     . .     . .\n",
            ". . ... ... ... .\n",
            ". .         .   .\n",
            ". ... ..... .....\n",
            ".     .   .*    .\n",
            "... ... . ... . .\n",
            ".   .   .     . .\n",
            "..... ... ... . .\n",
            ".   . .   .   . .\n",
            ". . . . ... ... .\n",
            ".*.   . .x  .   .\n",
            ".................",
        ),
    ),
    (
        "2. Medium (12x12)",
        concat!(
            ".........................\n",
            ".x    .   .     .   .  *.\n",
            ". ... . . . ... . . . ...\n",
            ". . .   . .   .   . .   .\n",
            ". . ..... ... ..... ... .\n",
            ".   .     .       .   . .\n",
            "... . ... . . ... . . . .\n",
            ". . .   .   .   .   .   .\n",
            ". . ... ....... ..... ...\n",
            ".       .   .   .   . . .\n",
            "....... ... . . . . . . .\n",
            ".   .       . .   .     .\n",
            ". . . ... ... . ... .....\n",
            ". .   .   .   . .   .   .\n",
            ". ..... ... ....... . . .\n",
            ".     .     . .       . .\n",
            "..... ... . . . ..... . .\n",
            ".   . .   .   .     .   .\n",
            ". . . . ..... ... . .....\n",
            ". .     .   .   . .     .\n",
            "....... ... . . ... .....\n",
            ".   .     .   . .   .   .\n",
            ". . . ... . ... . . . . .\n",
            ".*.   .     .   . .   .*.\n",
            ".........................",
        ),
    ),
    (
        "3. Hard (18x18)",
        concat!(
            ".....................................\n",
            ".   .       . . .*  .   .     .     .\n",
            ". . ......... . ... . ... . ... ... .\n",
            ".   .   . . . . .     .   . .    *. .\n",
            ". ... . . . . . ..... . ... ....... .\n",
            ". . .   . . . . .   .   .   .     . .\n",
            ". . . . . . . . . . ... ..... . ... .\n",
            ". . . . .   . . . . .   .     .     .\n",
            "... ........... ... . ....... ..... .\n",
            ".               .     .     .   .   .\n",
            "..................... . . . ... . ...\n",
            ".     .     .   .     . . . .   .   .\n",
            "... . . . ..... . ....... . ... ... .\n",
            ".   .   .   .     .*.     .     .   .\n",
            ". ... . ... . ..... . . ..... ... ...\n",
            ".   . .   .   .     . .       .     .\n",
            "... . ....... . ..... ..... . . ... .\n",
            ". .         .   .x.   .     . . . . .\n",
            ". . ..... . . ... . . . ....... . ...\n",
            ".     .   .     .   .       .   .   .\n",
            "..... ..... ... ....... ... . . . . .\n",
            ". .   . .     . .   . .   . . .   . .\n",
            ". . ... ......... . . ... . . .......\n",
            ".   .   .     .   .   . . . .   .   .\n",
            "... . ..... ......... . . ..... . . .\n",
            ". .     .       .   .   .   . .   . .\n",
            ". . ... . ..... . . ... ... . . ... .\n",
            ".   .       .     .     .   .   .   .\n",
            "... ......... ... ... ....... ... . .\n",
            ".   .  *.     . . .   .       .   . .\n",
            ". ... ... ..... . . ... . ... ... . .\n",
            ".     .   .       .     .   .   . . .\n",
            "..... . ... ... ... ....... ... ... .\n",
            ".     . .   .     .   .     .   .   .\n",
            ". ..... . ..... . . . . . ... . ... .\n",
            ".   .     .     .   .   . .   .     .\n",
            ".....................................",
        ),
    ),
    (
        "4. Insane (30x30)",
        concat!(
            ".............................................................\n",
            ".   .   .       .       .     .         .   .   .   .       .\n",
            ". . . ..... ... . ... . . . . ... ..... . . . ... . . ..... .\n",
            ". .       .   .   .   .   . .   . .   . . .       .       . .\n",
            ". ....... ... ..... ....... ... . . ... . ....... ... . ... .\n",
            ".       .                 .   .   . .   . .   .       . .   .\n",
            "... ... ... ..... ....... . . . ... . ... . . . ......... ...\n",
            ".   .     .     .     .   . . .   .   .     .   .       .   .\n",
            ". ... . . ..... ..... . . ... ... ... . . ..... . ..... ... .\n",
            ".   . . .     .   .   . .           .   .     . . .   .   . .\n",
            "... ... ... ......... . ... ... . . ..... ... . . . ..... . .\n",
            ".   . . .   .       .       .   . .             .       .   .\n",
            ". ... . . . ... ... ..... ... . . ... . ... . ..... ... ... .\n",
            ".     .   .     .   .         .   .   . .   . .     .       .\n",
            "..... . ... ... . ... ..... ..... . ... ..... . ..... .......\n",
            ". .   .       . .   .   .   . .   . .     .   .           . .\n",
            ". . . ..... . . . . ... . ... . ... . ... . ..... ... ... . .\n",
            ".   . .   . .     .   .         .     . . . .   .   . .     .\n",
            "..... . . ... ....... ... . ..... ..... . . . . ... . .......\n",
            ".     . .   . .       .   . . .   .   .     . .   .   . .   .\n",
            ". ... ..... . . ............. . . ... ... ... ... . . . ... .\n",
            ".   .   .   .     .   .     .   .     .   .   .   . .       .\n",
            "... . ... ... ... . . . ... ....... ... . . ... ..... . .....\n",
            ".   .   . .   . . . .     .   .   .     . .     .     . .   .\n",
            ". . ... . . ... . . ..... . ... . ............. . . ... . . .\n",
            ". .   .   .     . .   .         . .   .   .       .       . .\n",
            ". ... ... . ... . ... ........... . ..... . ... . ....... . .\n",
            ".     .   .   .   . .     .       .       . .   .     .   . .\n",
            "..... . ... . ... . ..... . . ... . . ....... ... ... .......\n",
            ".   .   .   .       .   .   .   .   . . .         .         .\n",
            "... ....... ..... ... . ..... ....... . . ... . ....... . . .\n",
            ".         . .   . .   . .     .     . .   .   .     .   . . .\n",
            ". ... ... . . . . ... ... ....... . . ... . ....... . . . ...\n",
            ".   .   .   . .   .       .       .   . .   .   .     .     .\n",
            "... ... ......... . ... ... ..... ... . . ... . . ... ... . .\n",
            ". . .       .   . .   .   .   . .   .   .     .   .   .   . .\n",
            ". . ... ... ... ..... ....... . . ... ... ... ...............\n",
            ".     .   . .   .   . .       .   .   .   .                 .\n",
            "... . ... ... ... ... . ........... ... ... ... . ... . . ...\n",
            ".   .   . .   .       .     .       . .       . .   . . .   .\n",
            ". ..... . . ......... ... ... . ... . ..... . . . ... . . ...\n",
            ". .     . . .   .   .   . .   .   .   .   . . . .   . . .   .\n",
            ". ..... . . ... . . ... . . ... . ..... . ... . ... ... ... .\n",
            ".   .     .   . . .     .   .   .     . . .   .             .\n",
            "... . . ..... . ... ....... ... ..... . . ... ..... ..... ...\n",
            ".   . . .   .         .   . .   .   .   .   .               .\n",
            ". . ..... . ... ... ... . . . ... ... ..... ............... .\n",
            ". .     . . . . .   .   . . . . .   . .   .   .     .     . .\n",
            ". ..... . ... ... ..... ... . . ... ..... . ... ... . . ... .\n",
            ". .   . .   .     .   .     .   .     .         . .   . .   .\n",
            "... ... ... ... ... . . ..... ... . . . ..... . . . ... . ...\n",
            ".       .   .       .     .       . . .     . .   . . . .   .\n",
            ". ....... ... . ......... . . ..... . ... . ... ... . ..... .\n",
            ".   . .       .     .   .   . .     .   . .     .     .   . .\n",
            "... . . ... ......... ....... . . ..... ..... . ... ... . . .\n",
            ".   .   .           .   . .     . .   .   .   .   .   . . . .\n",
            ". ... . ....... ... ... . ..... ... . ... . ... . ... . . . .\n",
            ".*.   .       .   .   .   .   .     . .   . .   . .     . . .\n",
            "... ... ... . . . ... ... . . . ..... . . . . ... . . ... . .\n",
            ".x      .   .   .   .     . .     .   . .     .   . .       .\n",
            ".............................................................",
        ),
    ),
    (
        "5. Draw The Maze",
        concat!(
            ".........................................................\n",
            ".x.   .     .   .     .   .     .       .       .   .   .\n",
            ". ... ... . . ... . . ... . . ... . ... ... . ..... ... .\n",
            ".     .     .     .     .     .   .   .   .   .       . .\n",
            "... ... . ... ... ... . ... . . . ... . . . . ... ... . .\n",
            ". .             .                                 . .   .\n",
            ". . ... . . . . . . . . . . . . . . . . . . . . . . . ...\n",
            ".   .                                               .   .\n",
            "... . . ....... . ....... . . ..... . ... ... ... . ... .\n",
            ".       .     .   .     .     .   .   . . . . . .       .\n",
            ". ... . . ... ... . ... ... ... . ... . . . . . . . . . .\n",
            ". .     . . .   . . . .   . .   .   . . . . . . .       .\n",
            ". . . . . . ... . . . ... . . ..... . . . . . . . . . ...\n",
            ".   .   . .   . . . .   . . . .   . . . . . . . .     . .\n",
            "..... . . . . . . . ..... . . ..... . . . . . . . . . . .\n",
            ".       . .   . . .       . .       . . . . . . .       .\n",
            ". . . . . . . . . . ... ... . ..... . . . . . . . . ... .\n",
            ". .     . .   . . . . . .   . .   . . . . . . . .     . .\n",
            "... . . . . ... . . . . ... . . . . . . ... ... . . . . .\n",
            ".       . . .   . . . .   . . .   . . .         .       .\n",
            ". ... . . ... ... . . ... . . . . . . ... ... ... . . ...\n",
            ".   .   .     .   . .   . . . .   . .   . . . .       . .\n",
            ". . . . ....... . ... . ... ... . ... . ... ... . . . . .\n",
            ". .                                               .     .\n",
            ". ... . . . . . . ....... ... ... ..... . . . . ... ... .\n",
            ".   . .           .     . . . . . .   .               . .\n",
            ". . . ... . . . . ... ... . . . . . ... . . . . . . . ...\n",
            ".     .   .         . .   . . . . . .           . .     .\n",
            "..... . . ... . . . . . . . ... . . ... . . . ... ..... .\n",
            ".   .   .           . .   .     . .   .             .   .\n",
            ". . ... . . ... . . . . . . ... . . ... . . ... ..... ...\n",
            ". .     .   .       . .   . . . . . .         .   .   . .\n",
            "... ..... ... . . . . . . . . . . . ... . . . ... . . . .\n",
            ".                   . .   . . . . .   .             .   .\n",
            ". . ... . . . . . . ... . ... ... ..... . . . . . . ... .\n",
            ". .   .                                                 .\n",
            ". ... . . ... ... . . ..... . ......... ......... . . ...\n",
            ".         . . . .     .   .   .       . .       .     . .\n",
            ". . . . ... ... ... ... . ... ....... . . ....... . . . .\n",
            ".   .   .         . .   .   .       . . . .             .\n",
            "..... . . ... ... . . ..... . . . ... . . . . . . . ... .\n",
            ".       . . . . . . . .   . .     .   . . .           . .\n",
            ". . . . . . . . . . . ..... . . ... ... . ....... . .....\n",
            ". .     . . . . . . .       .   .   .   .       .       .\n",
            ". ... . . . . . . . . ..... . ... ... . . ....... . . . .\n",
            ".       . . . . . . . .   . . .   .     . .             .\n",
            "... . . . . . . . . . . . . . . ... . . . . . . . . . ...\n",
            ".       . . . . . . . .   . . . .       . .           . .\n",
            ". ... . . . . . . . . . . . . . ....... . ....... . . . .\n",
            ".   .   . . . . . . . .   . . .       . .       .       .\n",
            "... . . ... ... ... ... . ... ......... ......... . .....\n",
            ". .                                                     .\n",
            ". ..... . . . . . . . . . ... . ... . . . . . . . ... ...\n",
            ".         .     .     .     .     .   .   .   .     . . .\n",
            "..... ... ....... . ... ... . ... . ... . ... ... ... . .\n",
            ".     .       .   . .   .   .   .       .   .     .    *.\n",
            ".........................................................",
        ),
    ),
];

pub fn default_records() -> Vec<MazeRecord> {
    DEFAULT_MAZES
        .iter()
        .map(|(name, layout)| MazeRecord::new(*name, *layout))
        .collect()
}

/// Fills an empty store with the starter mazes. Returns whether anything was added.
pub fn seed_if_empty<S: MazeStore + ?Sized>(store: &mut S) -> Result<bool, StoreError> {
    if !store.is_empty() {
        return Ok(false);
    }
    for record in default_records() {
        store.save(record)?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::validate::{validate, Mode};

    #[test]
    fn every_default_is_playable() {
        for (name, layout) in DEFAULT_MAZES {
            assert_eq!(validate(layout, Mode::Play), Ok(()), "{name}");
        }
    }

    #[test]
    fn seeding_only_touches_an_empty_store() {
        let mut store = MemoryStore::new();
        assert!(seed_if_empty(&mut store).unwrap());
        assert_eq!(store.names().len(), DEFAULT_MAZES.len());
        assert!(!seed_if_empty(&mut store).unwrap());
        assert_eq!(store.names()[0], "1. Easy (8x8)");
    }
}
