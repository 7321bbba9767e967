/// Sequential ids with an optional parent prefix: `dp1`, `tu2`,
/// `tu1_rg1`, ...
#[derive(Debug, Clone)]
pub struct IdGenerator {
    root: Option<String>,
    prefix: &'static str,
    last: u32,
}

impl IdGenerator {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            root: None,
            prefix,
            last: 0,
        }
    }

    pub fn with_root(root: impl Into<String>, prefix: &'static str) -> Self {
        Self {
            root: Some(root.into()),
            prefix,
            last: 0,
        }
    }

    pub fn create_id(&mut self) -> String {
        self.last += 1;
        self.format(self.last)
    }

    /// The id the next call to `create_id` returns.
    pub fn peek_id(&self) -> String {
        self.format(self.last + 1)
    }

    fn format(&self, n: u32) -> String {
        match &self.root {
            Some(root) => format!("{root}_{}{n}", self.prefix),
            None => format!("{}{n}", self.prefix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids() {
        let mut ids = IdGenerator::new("tu");
        assert_eq!(ids.peek_id(), "tu1");
        assert_eq!(ids.create_id(), "tu1");
        assert_eq!(ids.create_id(), "tu2");

        let mut nested = IdGenerator::with_root("tu1", "rg");
        assert_eq!(nested.create_id(), "tu1_rg1");
        assert_eq!(nested.peek_id(), "tu1_rg2");
    }
}
