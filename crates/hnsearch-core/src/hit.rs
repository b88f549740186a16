//! Search hit types - the records returned by the search API and cached per query

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a search hit, unique within one result set
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One search result record
///
/// Hits are immutable once fetched; identity is the `object_id`. The wire
/// format uses `objectID` and `num_comments`, and the live API sends `null`
/// for some fields, which decode to empty strings or zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "objectID")]
    pub object_id: ObjectId,

    #[serde(default, with = "nullable")]
    pub title: String,

    #[serde(default, with = "nullable")]
    pub url: String,

    #[serde(default, with = "nullable")]
    pub author: String,

    #[serde(default, with = "nullable")]
    pub num_comments: u64,

    #[serde(default, with = "nullable")]
    pub points: u64,
}

impl SearchHit {
    /// Create a hit with the given id and title, everything else empty
    pub fn new(object_id: impl Into<ObjectId>, title: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            title: title.into(),
            url: String::new(),
            author: String::new(),
            num_comments: 0,
            points: 0,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_comments(mut self, num_comments: u64) -> Self {
        self.num_comments = num_comments;
        self
    }

    pub fn with_points(mut self, points: u64) -> Self {
        self.points = points;
        self
    }
}

/// One page of results as returned by a single fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub hits: Vec<SearchHit>,

    /// Zero-based page index reported by the server
    #[serde(default)]
    pub page: u32,
}

impl SearchPage {
    pub fn new(hits: Vec<SearchHit>, page: u32) -> Self {
        Self { hits, page }
    }
}

/// Cached state for one query key
///
/// `hits` holds every page fetched so far in arrival order. Pages are
/// appended without de-duplication, so an item that moved between pages
/// upstream shows up twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    pub hits: Vec<SearchHit>,

    /// Last page index fetched (zero-based)
    pub page: u32,
}

impl PageResult {
    /// Append a freshly fetched page and record its index
    pub fn merge(&mut self, hits: Vec<SearchHit>, page: u32) {
        self.hits.extend(hits);
        self.page = page;
    }

    /// Remove the first hit with the given id, keeping the order of the rest
    pub fn remove(&mut self, object_id: &str) -> Option<SearchHit> {
        let index = self
            .hits
            .iter()
            .position(|hit| hit.object_id.as_str() == object_id)?;
        Some(self.hits.remove(index))
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Serde helper treating JSON `null` as the type's default value
mod nullable {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: Deserialize<'de> + Default,
        D: Deserializer<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wire_hit() {
        let json = r#"{
            "objectID": "1",
            "title": "Redux",
            "url": "https://github.com/reactjs/redux/",
            "author": "dan",
            "num_comments": 2,
            "points": 5,
            "created_at": "2015-06-02T00:00:00.000Z"
        }"#;

        let hit: SearchHit = serde_json::from_str(json).unwrap();
        assert_eq!(hit.object_id.as_str(), "1");
        assert_eq!(hit.title, "Redux");
        assert_eq!(hit.author, "dan");
        assert_eq!(hit.num_comments, 2);
        assert_eq!(hit.points, 5);
    }

    #[test]
    fn test_decode_null_fields() {
        let json = r#"{"objectID": "7", "title": null, "url": null, "author": "pg", "num_comments": null}"#;

        let hit: SearchHit = serde_json::from_str(json).unwrap();
        assert_eq!(hit.title, "");
        assert_eq!(hit.url, "");
        assert_eq!(hit.num_comments, 0);
        assert_eq!(hit.points, 0);
    }

    #[test]
    fn test_decode_page() {
        let json = r#"{"hits": [{"objectID": "1", "title": "a"}], "page": 3, "nbPages": 50}"#;

        let page: SearchPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.page, 3);
        assert_eq!(page.hits.len(), 1);
    }

    #[test]
    fn test_merge_appends_in_arrival_order() {
        let mut result = PageResult::default();
        result.merge(vec![SearchHit::new("1", "a")], 0);
        result.merge(vec![SearchHit::new("2", "b"), SearchHit::new("3", "c")], 1);

        let ids: Vec<_> = result.hits.iter().map(|h| h.object_id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(result.page, 1);
    }

    #[test]
    fn test_remove_first_match_only() {
        let mut result = PageResult::default();
        result.merge(
            vec![SearchHit::new("1", "a"), SearchHit::new("2", "b"), SearchHit::new("1", "dup")],
            0,
        );

        let removed = result.remove("1").unwrap();
        assert_eq!(removed.title, "a");
        assert_eq!(result.len(), 2);
        assert_eq!(result.hits[0].object_id.as_str(), "2");
        assert_eq!(result.hits[1].title, "dup");

        assert!(result.remove("missing").is_none());
        assert_eq!(result.len(), 2);
    }
}
