/// Opaque resource filter token: a bare name, `type::name` or a full URN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFilter(String);

impl ResourceFilter {
    /// Empty input means "no filter".
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() { return None; }
        Some(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Matches the whole id, or a `::`-delimited suffix of it.
    pub fn matches(&self, id: &str) -> bool {
        if id == self.0 { return true; }
        match id.strip_suffix(self.0.as_str()) {
            Some(rest) => rest.ends_with("::"),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URN: &str = "urn:pulumi:dev::shop::aws:s3/bucket:Bucket::logs";

    #[test]
    fn empty_token_is_no_filter() {
        assert_eq!(ResourceFilter::new(""), None);
    }

    #[test]
    fn matches_name_type_name_and_urn() {
        assert!(ResourceFilter::new("logs").unwrap().matches(URN));
        assert!(ResourceFilter::new("aws:s3/bucket:Bucket::logs").unwrap().matches(URN));
        assert!(ResourceFilter::new(URN).unwrap().matches(URN));
    }

    #[test]
    fn partial_segment_does_not_match() {
        assert!(!ResourceFilter::new("ogs").unwrap().matches(URN));
        assert!(!ResourceFilter::new("shop").unwrap().matches(URN));
        assert!(!ResourceFilter::new("logs").unwrap().matches("catalogs"));
    }
}
