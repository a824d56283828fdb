use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

#[derive(Debug, Clone, Copy)]
enum Segment {
    Field(&'static str),
    Index(usize),
}

/// The diagnostic location of the value being processed,
/// rendered as `player.inventory[2].name`.
#[derive(Debug, Clone, Default)]
pub(super) struct FieldPath {
    root: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn new(root: &str) -> Self {
        Self {
            root: String::from(root),
            segments: Vec::new(),
        }
    }

    #[inline]
    pub fn push_field(&mut self, name: &'static str) {
        self.segments.push(Segment::Field(name));
    }

    #[inline]
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    #[inline]
    pub fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)?;
        let mut empty = self.root.is_empty();
        for segment in &self.segments {
            match segment {
                Segment::Field(name) => {
                    if !empty {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
            empty = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::FieldPath;

    #[test]
    fn rendering() {
        let mut path = FieldPath::new("player");
        path.push_field("inventory");
        path.push_index(2);
        path.push_field("name");
        assert_eq!(path.to_string(), "player.inventory[2].name");

        path.pop();
        path.pop();
        assert_eq!(path.to_string(), "player.inventory");

        let mut path = FieldPath::new("");
        path.push_field("gold");
        assert_eq!(path.to_string(), "gold");
        let mut path = FieldPath::new("");
        path.push_index(0);
        path.push_field("id");
        assert_eq!(path.to_string(), "[0].id");
    }
}
