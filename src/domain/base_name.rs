use unicode_segmentation::UnicodeSegmentation;

const MAX_CHAR_LENGHT: usize = 256;
// ':' separates the parts of a store key, the rest are glob characters for key scans
const FORBIDDEN_CHARS: [char; 6] = [':', '*', '?', '[', ']', '\\'];

/// A basename label without its `.base.eth` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseName(String);

impl BaseName {
    pub fn parse(name: String) -> Result<BaseName, String> {
        let is_empty_or_whitespace = name.trim().is_empty();
        let is_too_long = name.graphemes(true).count() > MAX_CHAR_LENGHT;
        let contains_forbidden_chars = name
            .chars()
            .any(|char| FORBIDDEN_CHARS.contains(&char) || char.is_whitespace());

        if is_empty_or_whitespace || is_too_long || contains_forbidden_chars {
            return Err(format!("{} is not a valid basename", name));
        }

        Ok(Self(name))
    }
}

impl AsRef<str> for BaseName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
