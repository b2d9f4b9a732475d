use super::frame::encode_frame;
use crate::error::Result;
use crate::mem::{MemImage, is_listing_path};
use std::fs;
use std::io;
use std::path::Path;

//===========================================================================//

/// Loads a program to send over the serial link, as word indices paired
/// with words.  Only the words the file actually gives are returned.
///
/// A hex listing keeps its `@` positions, shifted up by `start`; a raw
/// binary is placed at consecutive indices from `start`.  Indices wrap
/// around after `0xff`.
pub fn load_program(path: &Path, start: u8) -> Result<Vec<(u8, u32)>> {
    let words = if is_listing_path(path) {
        MemImage::listing_words(&fs::read_to_string(path)?)?
            .into_iter()
            .map(|(index, word)| (index.wrapping_add(start), word))
            .collect()
    } else {
        let file = io::BufReader::new(fs::File::open(path)?);
        place_words(start, &MemImage::read_binary_words(file)?)
    };
    log::info!(
        "loaded {} program words from {}",
        words.len(),
        path.display()
    );
    Ok(words)
}

/// Pairs `words` with consecutive word indices starting at `start`.
pub fn place_words(start: u8, words: &[u32]) -> Vec<(u8, u32)> {
    words
        .iter()
        .enumerate()
        .map(|(offset, &word)| (start.wrapping_add(offset as u8), word))
        .collect()
}

/// Encodes one programming frame for each index/word pair, in order.
pub fn encode_words(words: &[(u8, u32)]) -> Vec<u8> {
    words.iter().flat_map(|&(index, word)| encode_frame(index, word)).collect()
}

//===========================================================================//


//===========================================================================//
