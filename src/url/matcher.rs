/// A set of ignore prefixes
///
/// An entry is ignored when it starts with any prefix, compared byte for
/// byte. No wildcard or case folding is applied. Blank prefixes are dropped
/// on construction since an empty prefix would match every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    prefixes: Vec<String>,
}

impl IgnoreList {
    /// Builds an ignore list from raw lines, trimming each one
    ///
    /// # Examples
    ///
    /// ```
    /// use aaaa_sieve::url::IgnoreList;
    ///
    /// let ignore = IgnoreList::new(["http://skip.com", "", "  https://ads."]);
    /// assert_eq!(ignore.len(), 2);
    /// assert!(ignore.is_ignored("http://skip.com/a"));
    /// assert!(ignore.is_ignored("https://ads.example"));
    /// assert!(!ignore.is_ignored("http://keep.com/a"));
    /// ```
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut prefixes: Vec<String> = Vec::new();
        for line in lines {
            let prefix = line.as_ref().trim();
            if !prefix.is_empty() && !prefixes.iter().any(|p| p == prefix) {
                prefixes.push(prefix.to_string());
            }
        }
        Self { prefixes }
    }

    /// Returns true if `entry` starts with any ignore prefix
    pub fn is_ignored(&self, entry: &str) -> bool {
        self.prefixes.iter().any(|prefix| entry.starts_with(prefix.as_str()))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
