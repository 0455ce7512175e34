//! Metadata Extractor
//!
//! Reads the front-matter block (between `---` lines at the top of a file) and
//! falls back to the document body for anything it does not provide:
//! - title: first `# ` heading, else the folder name for SKILL.md/README.md, else the file stem
//! - description: first prose paragraph
//! - tags: inline `#tag` markers outside code
//!
//! `SKILL.md` files also get a layout check: the Overview and Best Practices
//! sections, at least one fenced code example and a `- [ ]` checklist.
//!
//! Extraction never fails. Problems in the front-matter are reported as
//! warnings through `ParsedMetadata::Partial` and the document is still indexed.
//!
//! The front-matter reader handles the YAML subset used by skill documents
//! (scalars, quoted scalars, inline lists, block lists, one-level maps and block
//! scalars) without a full YAML library.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use chrono::NaiveDate;
use docs_index_core::{
    is_skill_path, Audience, DocStatus, Document, ExtractionWarning, MetadataFields,
    ParsedMetadata, SkillStructure,
};
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::utils::paths::parent_dir;

/// Parse a scanned file into a `Document`.
pub fn build_document(path: &str, content: &str) -> Document {
    let parsed = extract_metadata(path, content);
    let (fields, warnings) = parsed.into_parts();
    let body = MarkdownBody::new(split_front_matter(content).body);

    let mut tags = fields.tags;
    tags.sort();
    tags.dedup();

    Document {
        path: path.to_string(),
        title: fields.title.unwrap_or_else(|| title_from_path(path)),
        description: fields.description.unwrap_or_default(),
        tags,
        audience: fields.audience.unwrap_or_default(),
        status: fields.status.unwrap_or_default(),
        updated: fields.updated,
        related: fields.related,
        links: body.relative_links(),
        line_count: content.lines().count(),
        code_examples: body.code_block_count(),
        hash: compute_sha256(content),
        structure: is_skill_path(path).then(|| body.skill_structure()),
        warnings,
    }
}

/// Extract metadata from raw file content, filling gaps from the body.
pub fn extract_metadata(path: &str, content: &str) -> ParsedMetadata {
    let split = split_front_matter(content);
    let mut warnings = Vec::new();

    let mut fields = match split.front_matter {
        FrontMatter::Absent => MetadataFields::default(),
        FrontMatter::Unterminated { opened_at } => {
            warnings.push(ExtractionWarning::at_line(
                opened_at,
                "front-matter is not terminated by a closing '---' line",
            ));
            MetadataFields::default()
        }
        FrontMatter::Block(lines) => {
            let values = parse_yaml_block(&lines, &mut warnings);
            fields_from_values(values, &mut warnings)
        }
    };

    let body = MarkdownBody::new(split.body);
    if fields.title.is_none() {
        fields.title = body.first_heading();
    }
    if fields.title.is_none() {
        fields.title = Some(title_from_path(path));
    }
    if fields.description.is_none() {
        fields.description = body.first_paragraph();
    }
    if fields.tags.is_empty() {
        fields.tags = body.inline_tags();
    }

    ParsedMetadata::from_parts(fields, warnings)
}

/// Compute the SHA-256 hash of content, returned as a hex string.
pub fn compute_sha256(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex_encode(&hasher.finalize())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// `a/onboarding/SKILL.md` -> `onboarding`, `a/guide.md` -> `guide`
fn title_from_path(path: &str) -> String {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);

    let generic = ["skill", "readme", "index"];
    if generic.contains(&stem.to_lowercase().as_str()) {
        let folder = parent_dir(path).rsplit('/').next().unwrap_or("");
        if !folder.is_empty() {
            return folder.to_string();
        }
    }
    stem.to_string()
}

// --- Front-matter splitting ---

enum FrontMatter<'a> {
    Absent,
    /// Opening delimiter without a closing one (1-based line of the opener)
    Unterminated { opened_at: usize },
    /// (1-based line number, text) of every line between the delimiters
    Block(Vec<(usize, &'a str)>),
}

struct SplitContent<'a> {
    front_matter: FrontMatter<'a>,
    body: &'a str,
}

fn is_delimiter(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-')
}

fn split_front_matter(content: &str) -> SplitContent<'_> {
    let mut offset = 0;
    let mut opened_at = None;
    let mut block = Vec::new();

    for (idx, raw) in content.split_inclusive('\n').enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end_matches(['\n', '\r']);
        offset += raw.len();

        match opened_at {
            None => {
                if line.trim().is_empty() {
                    continue;
                }
                if is_delimiter(line) {
                    opened_at = Some(line_no);
                    continue;
                }
                return SplitContent {
                    front_matter: FrontMatter::Absent,
                    body: content,
                };
            }
            Some(_) => {
                if is_delimiter(line) {
                    return SplitContent {
                        front_matter: FrontMatter::Block(block),
                        body: &content[offset..],
                    };
                }
                block.push((line_no, line));
            }
        }
    }

    match opened_at {
        Some(opened_at) => SplitContent {
            front_matter: FrontMatter::Unterminated { opened_at },
            body: "",
        },
        None => SplitContent {
            front_matter: FrontMatter::Absent,
            body: content,
        },
    }
}

// --- YAML subset ---

#[derive(Debug, Clone, PartialEq)]
enum YamlValue {
    Scalar(String),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl YamlValue {
    fn as_text(&self) -> String {
        match self {
            YamlValue::Scalar(s) => s.clone(),
            YamlValue::List(items) => items.join(", "),
            YamlValue::Map(_) => String::new(),
        }
    }

    fn as_list(&self) -> Vec<String> {
        match self {
            YamlValue::List(items) => items.clone(),
            YamlValue::Scalar(s) => s
                .split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
            YamlValue::Map(_) => Vec::new(),
        }
    }
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn is_list_item(trimmed: &str) -> bool {
    trimmed == "-" || trimmed.starts_with("- ")
}

/// Split `key: value` at the first colon. The key may not contain spaces.
fn split_key_value(trimmed: &str) -> Option<(&str, &str)> {
    let (key, value) = trimmed.split_once(':')?;
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) || key.starts_with('-') {
        return None;
    }
    if !value.is_empty() && !value.starts_with(char::is_whitespace) {
        // `http://...` style scalars are not keys
        return None;
    }
    Some((key, value.trim()))
}

/// Remove surrounding quotes, or a trailing ` # comment` from a plain scalar.
fn clean_scalar(raw: &str, line_no: usize, warnings: &mut Vec<ExtractionWarning>) -> String {
    let s = raw.trim();
    for quote in ['"', '\''] {
        if s.starts_with(quote) {
            if s.len() >= 2 && s.ends_with(quote) {
                return s[1..s.len() - 1].to_string();
            }
            warnings.push(ExtractionWarning::at_line(
                line_no,
                "unterminated quoted string",
            ));
            return s.trim_start_matches(quote).to_string();
        }
    }
    match s.find(" #") {
        Some(idx) => s[..idx].trim_end().to_string(),
        None => s.to_string(),
    }
}

fn parse_inline_list(
    raw: &str,
    line_no: usize,
    warnings: &mut Vec<ExtractionWarning>,
) -> Vec<String> {
    let inner = raw.trim().trim_start_matches('[');
    let inner = match inner.strip_suffix(']') {
        Some(inner) => inner,
        None => {
            warnings.push(ExtractionWarning::at_line(line_no, "unterminated inline list"));
            inner
        }
    };
    inner
        .split(',')
        .map(|item| clean_scalar(item, line_no, warnings))
        .filter(|item| !item.is_empty())
        .collect()
}

/// Parse front-matter lines into top-level values.
fn parse_yaml_block(
    lines: &[(usize, &str)],
    warnings: &mut Vec<ExtractionWarning>,
) -> BTreeMap<String, (usize, YamlValue)> {
    let mut values = BTreeMap::new();
    let mut i = 0;

    while i < lines.len() {
        let (line_no, line) = lines[i];
        let trimmed = line.trim();
        i += 1;

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if indent_of(line) > 0 || is_list_item(trimmed) {
            warnings.push(ExtractionWarning::at_line(
                line_no,
                "value without a key",
            ));
            continue;
        }
        let Some((key, value)) = split_key_value(trimmed) else {
            warnings.push(ExtractionWarning::at_line(
                line_no,
                format!("expected 'key: value', found '{}'", trimmed),
            ));
            continue;
        };

        // Lines belonging to this key: indented, blank, or list items
        let child_start = i;
        while i < lines.len() {
            let child = lines[i].1;
            let child_trimmed = child.trim();
            if child_trimmed.is_empty() || indent_of(child) > 0 || is_list_item(child_trimmed) {
                i += 1;
            } else {
                break;
            }
        }
        let children = &lines[child_start..i];

        let parsed = match value {
            "" => parse_child_block(children, warnings),
            "|" | "|-" | "|+" => YamlValue::Scalar(join_block(children, "\n")),
            ">" | ">-" | ">+" => YamlValue::Scalar(join_block(children, " ")),
            v if v.starts_with('[') => YamlValue::List(parse_inline_list(v, line_no, warnings)),
            v => {
                let mut scalar = clean_scalar(v, line_no, warnings);
                // Plain multi-line scalar continued on indented lines
                let continuation = join_block(children, " ");
                if !continuation.is_empty() {
                    scalar.push(' ');
                    scalar.push_str(&continuation);
                }
                YamlValue::Scalar(scalar)
            }
        };

        if values.contains_key(key) {
            warnings.push(ExtractionWarning::at_line(
                line_no,
                format!("duplicate key '{}', last value wins", key),
            ));
        }
        values.insert(key.to_string(), (line_no, parsed));
    }

    values
}

/// Value given on the lines below a `key:` with nothing after the colon.
fn parse_child_block(
    children: &[(usize, &str)],
    warnings: &mut Vec<ExtractionWarning>,
) -> YamlValue {
    let content: Vec<(usize, &str)> = children
        .iter()
        .copied()
        .filter(|(_, l)| !l.trim().is_empty())
        .collect();
    let Some(&(_, first)) = content.first() else {
        return YamlValue::Scalar(String::new());
    };
    let base_indent = indent_of(first);

    if is_list_item(first.trim()) {
        let mut items = Vec::new();
        for (line_no, line) in content {
            let trimmed = line.trim();
            if indent_of(line) == base_indent && is_list_item(trimmed) {
                let item = clean_scalar(trimmed.trim_start_matches('-'), line_no, warnings);
                if !item.is_empty() {
                    items.push(item);
                }
            } else if indent_of(line) <= base_indent {
                warnings.push(ExtractionWarning::at_line(
                    line_no,
                    "expected a list item",
                ));
            }
            // Deeper lines are nested content of the previous item
        }
        return YamlValue::List(items);
    }

    if split_key_value(first.trim()).is_some() {
        let mut map = BTreeMap::new();
        for (line_no, line) in content {
            if indent_of(line) != base_indent {
                continue;
            }
            match split_key_value(line.trim()) {
                Some((k, v)) => {
                    map.insert(k.to_string(), clean_scalar(v, line_no, warnings));
                }
                None => warnings.push(ExtractionWarning::at_line(
                    line_no,
                    format!("expected 'key: value', found '{}'", line.trim()),
                )),
            }
        }
        return YamlValue::Map(map);
    }

    YamlValue::Scalar(join_block(children, " "))
}

/// Join indented block lines, dropping the common indentation.
fn join_block(lines: &[(usize, &str)], separator: &str) -> String {
    let base = lines
        .iter()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(_, l)| indent_of(l))
        .min()
        .unwrap_or(0);
    let mut parts: Vec<&str> = lines
        .iter()
        .map(|(_, l)| if l.len() > base { &l[base..] } else { "" })
        .map(str::trim_end)
        .collect();
    while parts.last().is_some_and(|l| l.is_empty()) {
        parts.pop();
    }
    parts.join(separator).trim().to_string()
}

// --- Field mapping ---

fn fields_from_values(
    mut values: BTreeMap<String, (usize, YamlValue)>,
    warnings: &mut Vec<ExtractionWarning>,
) -> MetadataFields {
    let mut take = |keys: &[&str]| keys.iter().find_map(|k| values.remove(*k));

    let title = take(&["title"]).or_else(|| take(&["name"]));
    let description = take(&["description", "summary"]);
    let tags = take(&["tags", "keywords"]);
    let audience = take(&["audience"]);
    let status = take(&["status"]);
    let updated = take(&["updated", "last_updated", "last-updated"]);
    let created = take(&["created"]);
    let related = take(&["related", "see_also", "see-also"]);

    let mut fields = MetadataFields {
        title: title.map(|(_, v)| v.as_text()).filter(|t| !t.is_empty()),
        description: description
            .map(|(_, v)| v.as_text())
            .filter(|d| !d.is_empty()),
        tags: tags
            .map(|(_, v)| v.as_list().iter().map(|t| normalize_tag(t)).collect())
            .unwrap_or_default(),
        related: related.map(|(_, v)| v.as_list()).unwrap_or_default(),
        ..MetadataFields::default()
    };
    fields.tags.retain(|t| !t.is_empty());

    if let Some((line_no, value)) = audience {
        match value.as_text().parse::<Audience>() {
            Ok(audience) => fields.audience = Some(audience),
            Err(e) => warnings.push(ExtractionWarning::at_line(line_no, e.to_string())),
        }
    }
    if let Some((line_no, value)) = status {
        match value.as_text().parse::<DocStatus>() {
            Ok(status) => fields.status = Some(status),
            Err(e) => warnings.push(ExtractionWarning::at_line(line_no, e.to_string())),
        }
    }

    for (line_no, value) in [updated, created].into_iter().flatten() {
        if fields.updated.is_some() {
            break;
        }
        let text = value.as_text();
        match parse_date(&text) {
            Some(date) => fields.updated = Some(date),
            None => warnings.push(ExtractionWarning::at_line(
                line_no,
                format!("invalid date '{}', expected YYYY-MM-DD", text),
            )),
        }
    }

    fields
}

/// `2024-03-01`, or the date part of an RFC 3339 timestamp
fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    let (date_part, rest) = text.split_at_checked(10)?;
    if rest.starts_with('T') || rest.starts_with(' ') {
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    } else {
        None
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().trim_start_matches('#').trim().to_lowercase()
}

// --- Body inspection ---

fn inline_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|\s)#([A-Za-z][A-Za-z0-9_-]*)").expect("valid regex"))
}

fn link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"!?\[[^\]]*\]\(\s*<?([^)\s>]+)>?(?:\s+"[^"]*")?\s*\)"#).expect("valid regex")
    })
}

fn inline_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`[^`]*`").expect("valid regex"))
}

/// Markdown body with code fences already told apart from prose
struct MarkdownBody<'a> {
    /// (inside a fenced code block, line)
    lines: Vec<(bool, &'a str)>,
    fences: usize,
}

impl<'a> MarkdownBody<'a> {
    fn new(body: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut in_fence = false;
        let mut fences = 0;
        for line in body.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                if !in_fence {
                    fences += 1;
                }
                in_fence = !in_fence;
                lines.push((true, line));
                continue;
            }
            lines.push((in_fence, line));
        }
        Self { lines, fences }
    }

    fn prose(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines
            .iter()
            .filter(|(in_code, _)| !in_code)
            .map(|(_, line)| *line)
    }

    fn code_block_count(&self) -> usize {
        self.fences
    }

    fn headings(&self) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        self.prose().filter_map(heading)
    }

    /// Text of the first level-1 heading
    fn first_heading(&self) -> Option<String> {
        self.headings()
            .find(|(level, _)| *level == 1)
            .map(|(_, text)| text.to_string())
    }

    fn has_section(&self, name: &str) -> bool {
        self.headings().any(|(_, text)| {
            let text = text.to_lowercase();
            let name = name.to_lowercase();
            text.strip_prefix(name.as_str())
                .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric()))
        })
    }

    fn skill_structure(&self) -> SkillStructure {
        SkillStructure {
            has_overview: self.has_section("Overview"),
            has_best_practices: self.has_section("Best Practices"),
            has_code_examples: self.fences > 0,
            has_checklist: self.prose().any(is_checklist_item),
        }
    }

    /// First run of consecutive prose lines, joined with spaces.
    fn first_paragraph(&self) -> Option<String> {
        let mut paragraph: Vec<&str> = Vec::new();
        for (in_code, line) in &self.lines {
            let trimmed = line.trim();
            let is_prose = !in_code && is_prose_line(trimmed);
            if is_prose {
                paragraph.push(trimmed);
            } else if !paragraph.is_empty() {
                break;
            }
        }
        if paragraph.is_empty() {
            None
        } else {
            Some(paragraph.join(" "))
        }
    }

    fn inline_tags(&self) -> Vec<String> {
        let mut tags = BTreeSet::new();
        for line in self.prose() {
            let line = inline_code_regex().replace_all(line, "");
            for cap in inline_tag_regex().captures_iter(&line) {
                tags.insert(cap[1].to_lowercase());
            }
        }
        tags.into_iter().collect()
    }

    /// Relative links to Markdown files, without anchors, deduplicated in order.
    fn relative_links(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut links = Vec::new();
        for line in self.prose() {
            let line = inline_code_regex().replace_all(line, "");
            for cap in link_regex().captures_iter(&line) {
                let target = &cap[1];
                if is_external(target) {
                    continue;
                }
                let path = strip_fragment(target);
                if !path.to_lowercase().ends_with(".md") {
                    continue;
                }
                if seen.insert(path.to_string()) {
                    links.push(path.to_string());
                }
            }
        }
        links
    }
}

/// `## Overview ##` -> (2, "Overview")
fn heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim();
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim().trim_end_matches('#').trim();
    (!text.is_empty()).then_some((level, text))
}

fn is_checklist_item(line: &str) -> bool {
    let trimmed = line.trim_start();
    let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    else {
        return false;
    };
    ["[ ]", "[x]", "[X]"]
        .iter()
        .any(|marker| rest.starts_with(*marker))
}

fn is_prose_line(trimmed: &str) -> bool {
    if trimmed.is_empty() {
        return false;
    }
    let structural = ["#", "|", "<!--", "![", "[![", "- ", "* ", "+ ", ">", "<"];
    if structural.iter().any(|p| trimmed.starts_with(p)) {
        return false;
    }
    if is_delimiter(trimmed) || trimmed.chars().all(|c| c == '*' || c == '_' || c == ' ') {
        return false;
    }
    // Ordered list items
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    !(digits > 0 && trimmed[digits..].starts_with(". "))
}

/// URLs with a scheme and mail links are not document references
pub fn is_external(target: &str) -> bool {
    target.contains("://") || target.starts_with("mailto:") || target.starts_with("tel:")
}

/// Drop `#anchor` and `?query` parts of a link target.
pub fn strip_fragment(target: &str) -> &str {
    let end = target.find(['#', '?']).unwrap_or(target.len());
    &target[..end]
}
