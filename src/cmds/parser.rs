use regex::Regex;

pub fn parse_regex(s: &str) -> ::core::result::Result<Regex, String> {
    Regex::new(s).map_err(|e| e.to_string())
}

/// free text given as several shell words, joined back with single spaces.
pub fn join_words(words: &[String]) -> String { words.join(" ") }

/// store targets understood by `--store` / `FEED_STORE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    Memory,
    File(String),
    Mongo(String),
}

pub fn parse_store_target(s: &str) -> ::core::result::Result<StoreTarget, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("empty store target".to_string());
    }

    Ok(match s {
        "memory" => StoreTarget::Memory,
        s if s.starts_with("mongodb://") || s.starts_with("mongodb+srv://") =>
            StoreTarget::Mongo(s.to_string()),
        s => match s.strip_prefix("file:") {
            Some("") => return Err("`file:` needs a path".to_string()),
            Some(path) => StoreTarget::File(path.to_string()),
            None => StoreTarget::File(s.to_string()),
        },
    })
}

#[test]
fn store_targets() {
    assert_eq!(parse_store_target("memory"), Ok(StoreTarget::Memory));
    assert_eq!(
        parse_store_target("file:/tmp/feed.json"),
        Ok(StoreTarget::File("/tmp/feed.json".to_string()))
    );
    assert_eq!(
        parse_store_target("feed.json"),
        Ok(StoreTarget::File("feed.json".to_string()))
    );
    assert_eq!(
        parse_store_target("mongodb://localhost:27017/feed"),
        Ok(StoreTarget::Mongo("mongodb://localhost:27017/feed".to_string()))
    );
    assert!(parse_store_target("file:").is_err());
    assert!(parse_store_target(" ").is_err());
}
