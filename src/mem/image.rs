use super::{MEM_WORDS, NOP_WORD};
use crate::error::{NodeError, Result};
use crate::parse::{ListingAst, ListingEntryAst, ParseError};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

//===========================================================================//

/// The demonstration program shipped in the lowest eight words of memory.
/// It stores the bytes `0x00..=0x0f` to byte addresses `0x100..=0x10f`, then
/// spins forever.
const SEED_PROGRAM: [u32; 8] = [
    0x1000_0093, // addi x1, x0, 0x100
    0x0000_0113, // addi x2, x0, 0
    0x0100_0193, // addi x3, x0, 16
    0x0020_8023, // sb   x2, 0(x1)
    0x0010_8093, // addi x1, x1, 1
    0x0011_0113, // addi x2, x2, 1
    0xfe31_4ae3, // blt  x2, x3, -12
    0x0000_006f, // jal  x0, 0
];

//===========================================================================//

/// The initial contents of the node's memory, like a firmware image.
///
/// An image always covers the whole memory; words not given by the source
/// of the image hold [`NOP_WORD`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MemImage {
    words: Vec<u32>,
}

impl MemImage {
    /// Returns an image where every word is [`NOP_WORD`].
    pub fn nop() -> MemImage {
        MemImage { words: vec![NOP_WORD; MEM_WORDS] }
    }

    /// Returns the default power-on image: the seed program in words 0-7,
    /// and NOPs everywhere else.
    pub fn seed() -> MemImage {
        let mut image = MemImage::nop();
        image.words[..SEED_PROGRAM.len()].copy_from_slice(&SEED_PROGRAM);
        image
    }

    /// Returns an image starting with the given words, padded out with NOPs.
    pub fn from_words(words: Vec<u32>) -> Result<MemImage> {
        if words.len() > MEM_WORDS {
            return Err(NodeError::ImageTooLarge {
                words: words.len(),
                capacity: MEM_WORDS,
            });
        }
        let mut words = words;
        words.resize(MEM_WORDS, NOP_WORD);
        Ok(MemImage { words })
    }

    pub(crate) fn from_array(words: &[u32; MEM_WORDS]) -> MemImage {
        MemImage { words: words.to_vec() }
    }

    /// Returns all words of the image, starting at index zero.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Parses a hex memory listing (`$readmemh` style): whitespace-separated
    /// hex words, `@index` directives that move the load cursor, and `//`
    /// comments.
    pub fn parse_listing(source: &str) -> Result<MemImage> {
        let mut image = MemImage::nop();
        for (index, word) in MemImage::listing_words(source)? {
            image.words[usize::from(index)] = word;
        }
        Ok(image)
    }

    /// Parses a hex memory listing into only the words it gives, paired with
    /// their word indices, in source order.  Unlike
    /// [`MemImage::parse_listing`], words the listing never mentions are not
    /// filled in.
    pub fn listing_words(source: &str) -> Result<Vec<(u8, u32)>> {
        let ast = ListingAst::parse_source(source)?;
        let mut words = Vec::new();
        let mut cursor: usize = 0;
        let mut origin = None;
        for entry in ast.entries {
            match entry {
                ListingEntryAst::Origin(span, index) => {
                    cursor = usize::from(index);
                    origin = Some(span);
                }
                ListingEntryAst::Word(span, word) => {
                    let Ok(index) = u8::try_from(cursor) else {
                        let message = format!(
                            "word would be loaded at index {cursor:#x}, past \
                             the end of memory"
                        );
                        let mut error = ParseError::new(span, message);
                        if let Some(origin) = origin {
                            let label = "load cursor was set here".to_string();
                            error = error.with_label(origin, label);
                        }
                        return Err(NodeError::Parse(vec![error]));
                    };
                    words.push((index, word));
                    cursor += 1;
                }
            }
        }
        Ok(words)
    }

    /// Formats the image as a hex memory listing that
    /// [`MemImage::parse_listing`] will read back.  Runs of NOPs are skipped
    /// with `@` directives.
    pub fn to_listing(&self) -> String {
        let mut out = String::new();
        let mut expected_index = 0;
        for (index, &word) in self.words.iter().enumerate() {
            if word == NOP_WORD {
                continue;
            }
            if index != expected_index {
                out.push_str(&format!("@{index:02x}\n"));
            }
            out.push_str(&format!("{word:08x}\n"));
            expected_index = index + 1;
        }
        out
    }

    /// Reads a raw binary image: consecutive little-endian 32-bit words.
    pub fn read_binary<R: Read>(reader: R) -> Result<MemImage> {
        MemImage::from_words(MemImage::read_binary_words(reader)?)
    }

    /// Reads consecutive little-endian 32-bit words, without padding them
    /// out to a whole image.
    pub fn read_binary_words<R: Read>(mut reader: R) -> Result<Vec<u32>> {
        let mut bytes = Vec::<u8>::new();
        reader.read_to_end(&mut bytes)?;
        if bytes.len() % 4 != 0 {
            return Err(NodeError::PartialWord(bytes.len() % 4));
        }
        let mut cursor = io::Cursor::new(bytes.as_slice());
        let mut words = Vec::with_capacity(bytes.len() / 4);
        for _ in 0..bytes.len() / 4 {
            words.push(cursor.read_u32::<LittleEndian>()?);
        }
        Ok(words)
    }

    /// Writes the image as a raw binary of little-endian 32-bit words.
    pub fn write_binary<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for &word in self.words.iter() {
            writer.write_u32::<LittleEndian>(word)?;
        }
        Ok(())
    }

    /// Loads an image from a file.  Files with a `.hex` or `.mem` extension
    /// are parsed as hex listings; anything else is read as a raw binary.
    pub fn load_file(path: &Path) -> Result<MemImage> {
        let image = if is_listing_path(path) {
            MemImage::parse_listing(&fs::read_to_string(path)?)?
        } else {
            MemImage::read_binary(io::BufReader::new(fs::File::open(path)?))?
        };
        log::info!("loaded memory image from {}", path.display());
        Ok(image)
    }
}

/// Returns true if the path names a hex listing (`.hex` or `.mem`) rather
/// than a raw binary.
pub(crate) fn is_listing_path(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| {
        ext.eq_ignore_ascii_case("hex") || ext.eq_ignore_ascii_case("mem")
    })
}

impl Default for MemImage {
    fn default() -> MemImage {
        MemImage::seed()
    }
}

//===========================================================================//


//===========================================================================//
