//! Relationship descriptor parsing and target resolution.

use crate::error::{Error, Result};
use crate::walker::{Step, XmlWalker};
use std::collections::HashMap;
use std::io::BufRead;

/// Mapping from relationship id to normalized target part name,
/// scoped to one owning part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipMap {
    owner: String,
    targets: HashMap<String, String>,
}

impl RelationshipMap {
    /// Create an empty map owned by `owner`.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            targets: HashMap::new(),
        }
    }

    /// Parse a `.rels` part whose relationships belong to `owner`.
    ///
    /// Entries without an `Id` or `Target`, and external targets, are skipped.
    pub fn parse<R: BufRead>(owner: impl Into<String>, reader: R) -> Result<Self> {
        let mut map = Self::new(owner);
        let mut walker = XmlWalker::new(reader);

        loop {
            match walker.next()? {
                Step::Start if walker.is("Relationship") => {
                    let external = walker
                        .attr("TargetMode")
                        .is_some_and(|m| m.eq_ignore_ascii_case("external"));
                    if external {
                        continue;
                    }
                    let (Some(id), Some(target)) = (walker.attr("Id"), walker.attr("Target"))
                    else {
                        continue;
                    };
                    if id.is_empty() || target.is_empty() {
                        continue;
                    }
                    let resolved = resolve_target(&map.owner, &target);
                    map.targets.insert(id, resolved);
                }
                Step::Eof => break,
                _ => {}
            }
        }

        Ok(map)
    }

    /// Name of the part these relationships belong to.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Target part name for `id`, if any.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.targets.get(id).map(String::as_str)
    }

    /// Add a relationship; `target` is resolved against the owner.
    pub fn insert(&mut self, id: impl Into<String>, target: &str) {
        let resolved = resolve_target(&self.owner, target);
        self.targets.insert(id.into(), resolved);
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether there are no relationships.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Every relationship map in a package, keyed by owning part name.
#[derive(Debug, Clone, Default)]
pub struct Relations {
    maps: HashMap<String, RelationshipMap>,
}

impl Relations {
    /// Add a parsed map.
    pub fn add(&mut self, map: RelationshipMap) {
        self.maps.insert(map.owner.clone(), map);
    }

    /// Relationship map of `owner`.
    pub fn of(&self, owner: &str) -> Option<&RelationshipMap> {
        self.maps.get(owner)
    }

    /// Resolve `(owner, id)` to a target part name.
    pub fn resolve(&self, owner: &str, id: &str) -> Result<&str> {
        let map = self
            .maps
            .get(owner)
            .ok_or_else(|| Error::unresolved(id, format!("{owner} has no relationships")))?;
        map.get(id)
            .ok_or_else(|| Error::unresolved(id, format!("not listed for {owner}")))
    }
}

/// Name of the part a `.rels` part describes.
///
/// `word/_rels/document.xml.rels` belongs to `word/document.xml`;
/// `_rels/.rels` belongs to the package root (empty name).
pub fn owner_of(rels_name: &str) -> Option<String> {
    let file = rels_name.strip_suffix(".rels")?;
    let (dir, name) = match file.rfind("_rels/") {
        Some(pos) => (&file[..pos], &file[pos + "_rels/".len()..]),
        None => return None,
    };
    if name.contains('/') {
        return None;
    }
    Some(format!("{dir}{name}"))
}

/// Name of the `.rels` part describing `part`.
pub fn rels_name_for(part: &str) -> String {
    match part.rfind('/') {
        Some(pos) => format!("{}/_rels/{}.rels", &part[..pos], &part[pos + 1..]),
        None => format!("_rels/{part}.rels"),
    }
}

/// Resolve a relationship target against the directory of its owning part.
///
/// Absolute targets (`/ppt/media/x.png`) are taken from the package root;
/// `..` and `.` segments are applied to the owner's directory.
pub fn resolve_target(owner: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return normalize(std::iter::empty(), absolute);
    }
    let dir = match owner.rfind('/') {
        Some(pos) => &owner[..pos],
        None => "",
    };
    normalize(dir.split('/'), target)
}

fn normalize<'a>(base: impl Iterator<Item = &'a str>, relative: &'a str) -> String {
    let mut segments: Vec<&str> = base.filter(|s| !s.is_empty()).collect();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart" Target="../charts/chart1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="/ppt/media/image1.png"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>
  <Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout"/>
  <Relationship Target="../diagrams/data1.xml"/>
  <Relationship Id="rId5" Type="x" Target="./../diagrams/data1.xml"/>
</Relationships>"#;

    #[test]
    fn test_parse_relationships() {
        let map = RelationshipMap::parse("ppt/slides/slide1.xml", RELS.as_bytes()).unwrap();
        assert_eq!(map.owner(), "ppt/slides/slide1.xml");
        assert_eq!(map.get("rId1"), Some("ppt/charts/chart1.xml"));
        assert_eq!(map.get("rId2"), Some("ppt/media/image1.png"));
        assert_eq!(map.get("rId3"), None);
        assert_eq!(map.get("rId4"), None);
        assert_eq!(map.get("rId5"), Some("ppt/diagrams/data1.xml"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("word/document.xml", "charts/chart1.xml"),
            "word/charts/chart1.xml"
        );
        assert_eq!(
            resolve_target("word/document.xml", "./media/image1.png"),
            "word/media/image1.png"
        );
        assert_eq!(
            resolve_target("xl/drawings/drawing1.xml", "../charts/chart2.xml"),
            "xl/charts/chart2.xml"
        );
        assert_eq!(
            resolve_target("xl/worksheets/sheet1.xml", "/xl/drawings/drawing1.xml"),
            "xl/drawings/drawing1.xml"
        );
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
    }

    #[test]
    fn test_owner_of() {
        assert_eq!(
            owner_of("word/_rels/document.xml.rels").as_deref(),
            Some("word/document.xml")
        );
        assert_eq!(
            owner_of("xl/drawings/_rels/drawing3.xml.rels").as_deref(),
            Some("xl/drawings/drawing3.xml")
        );
        assert_eq!(owner_of("_rels/.rels").as_deref(), Some(""));
        assert_eq!(owner_of("word/document.xml"), None);
        assert_eq!(rels_name_for("ppt/slides/slide2.xml"), "ppt/slides/_rels/slide2.xml.rels");
    }

    #[test]
    fn test_resolve_missing_is_recoverable() {
        let mut relations = Relations::default();
        let mut map = RelationshipMap::new("word/document.xml");
        map.insert("rId9", "charts/chart1.xml");
        relations.add(map);

        assert_eq!(
            relations.resolve("word/document.xml", "rId9").unwrap(),
            "word/charts/chart1.xml"
        );
        let err = relations.resolve("word/document.xml", "rId1").unwrap_err();
        assert!(err.is_recoverable());
        let err = relations.resolve("word/footer1.xml", "rId9").unwrap_err();
        assert!(matches!(err, Error::RelationshipResolution { .. }));
    }
}
