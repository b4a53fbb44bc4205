//! Heuristic extraction from taxonomic page HTML
//!
//! The description pages carry one main morphology paragraph per taxon.
//! Selection and field extraction are both keyword-driven:
//!
//! 1. the first `<p>` text node matching any paragraph rule is the
//!    description paragraph (rules are ordered from most to least
//!    specific; the last rule covers taxa without flowers, e.g.
//!    gymnosperms);
//! 2. seven morphology fields are pulled from that paragraph
//!    independently, each as the join of every non-overlapping match of
//!    a keyword-bounded pattern. Stem/leaf/flower/fruit/host patterns
//!    are sentence-bounded (stop at 。), height/diameter patterns are
//!    clause-bounded (stop at 。 or ，).
//!
//! The scientific namer is located in the raw HTML, anchored on the
//! bolded genus+species heading, not in the paragraph text.
//!
//! Each rule is a standalone (predicate, extractor) entry so the fragile
//! heuristics stay independently testable against literal HTML fixtures.

use regex::Regex;
use scraper::{Html, Selector};
use specimen_common::{Result, SpecimenError};

/// Paragraph-selection rule: all markers must appear in the text
#[derive(Debug, Clone, Copy)]
pub struct ParagraphRule {
    pub name: &'static str,
    markers: &'static [&'static str],
}

impl ParagraphRule {
    /// Whether every marker of this rule appears in the paragraph.
    pub fn matches(&self, text: &str) -> bool {
        self.markers.iter().all(|marker| text.contains(marker))
    }
}

/// Ordered paragraph rules, most specific first
pub const PARAGRAPH_RULES: [ParagraphRule; 3] = [
    ParagraphRule {
        name: "full-morphology",
        markers: &["高", "茎", "叶", "花", "果"],
    },
    ParagraphRule {
        name: "leaf-flower",
        markers: &["叶", "花"],
    },
    // Gymnosperms and other taxa without flowers
    ParagraphRule {
        name: "stem-leaf",
        markers: &["茎", "叶"],
    },
];

/// Morphology fields pulled from the description paragraph, in the
/// extract field order (body height, DBH, stem, leaf, flower, fruit,
/// host).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MorphologyFields {
    pub body_height: String,
    pub dbh: String,
    pub stem: String,
    pub leaf: String,
    pub flower: String,
    pub fruit: String,
    pub host: String,
}

/// One field-extraction rule: keyword-bounded pattern plus the literal
/// separator joining its matches
struct FieldRule {
    pattern: Regex,
    separator: &'static str,
}

impl FieldRule {
    fn new(pattern: &str, separator: &'static str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern).map_err(|e| SpecimenError::parse(e.to_string()))?,
            separator,
        })
    }

    /// Join every non-overlapping match within the paragraph. No match
    /// yields an empty string, not an omission.
    fn extract(&self, paragraph: &str) -> String {
        self.pattern
            .find_iter(paragraph)
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(self.separator)
    }
}

/// Compiled extraction rules, built once per fetcher
pub struct Extractor {
    body_height: FieldRule,
    dbh: FieldRule,
    stem: FieldRule,
    leaf: FieldRule,
    flower: FieldRule,
    fruit: FieldRule,
    host: FieldRule,
}

impl Extractor {
    /// Compile the field patterns.
    pub fn new() -> Result<Self> {
        Ok(Self {
            // Clause-bounded: stop at either 。 or ，
            body_height: FieldRule::new("[^，。]*高[^，。]*", " | ")?,
            dbh: FieldRule::new("[^，。]*胸径[^，。]*", " | ")?,
            // Sentence-bounded: stop at 。 only
            stem: FieldRule::new("[^。]*茎[^。]*", "。 | ")?,
            leaf: FieldRule::new("[^。]*叶[^。]*", "。 | ")?,
            flower: FieldRule::new("[^。]*花[^。]*", "。 | ")?,
            fruit: FieldRule::new("[^。]*果[^。]*", "。 | ")?,
            host: FieldRule::new("[^。]*寄主[^。]*", "。 | ")?,
        })
    }

    /// First text node of every paragraph-level element, in document
    /// order.
    pub fn paragraphs(html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("p").expect("static selector");
        document
            .select(&selector)
            .filter_map(|p| p.text().next())
            .map(|text| text.to_string())
            .collect()
    }

    /// Select the description paragraph: the first paragraph satisfying
    /// any rule, rules tried in order of specificity.
    pub fn select_paragraph<'a>(&self, paragraphs: &'a [String]) -> Option<&'a str> {
        paragraphs
            .iter()
            .find(|text| PARAGRAPH_RULES.iter().any(|rule| rule.matches(text)))
            .map(|text| text.as_str())
    }

    /// Extract the seven morphology fields from the selected paragraph.
    pub fn extract_fields(&self, paragraph: &str) -> MorphologyFields {
        MorphologyFields {
            body_height: self.body_height.extract(paragraph),
            dbh: self.dbh.extract(paragraph),
            stem: self.stem.extract(paragraph),
            leaf: self.leaf.extract(paragraph),
            flower: self.flower.extract(paragraph),
            fruit: self.fruit.extract(paragraph),
            host: self.host.extract(paragraph),
        }
    }

    /// Select and extract in one step; no matching paragraph yields all
    /// fields empty.
    pub fn extract_morphology(&self, html: &str) -> MorphologyFields {
        let paragraphs = Self::paragraphs(html);
        match self.select_paragraph(&paragraphs) {
            Some(paragraph) => self.extract_fields(paragraph),
            None => MorphologyFields::default(),
        }
    }

    /// Extract the scientific namer from the raw HTML.
    ///
    /// The namer sits between the bolded genus+species heading and the
    /// following `<span>`. Returns `None` when the marker pattern is
    /// absent.
    pub fn extract_namer(&self, html: &str, genus: &str, species: &str) -> Option<String> {
        let pattern = format!(
            "<b>{}</b> <b>{}</b>([^><]*)<span",
            regex::escape(genus),
            regex::escape(species)
        );
        let re = Regex::new(&pattern).ok()?;
        re.captures(html)
            .map(|captures| captures[1].trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Chenopodium-like description paragraph: height, stem, leaf,
    // flower and fruit markers all present.
    const FULL_PARAGRAPH: &str = "一年生草本，高30-150厘米。茎直立，粗壮，具条棱。\
叶片菱状卵形至宽披针形。花两性，数个团集。果皮与种子贴生。";

    // Gymnosperm-like paragraph: stem and leaf only, no flower.
    const GYMNOSPERM_PARAGRAPH: &str = "乔木，高达45米，胸径1.5米。茎干端直。叶条形，扁平。";

    fn extractor() -> Extractor {
        Extractor::new().unwrap()
    }

    #[test]
    fn test_paragraph_rule_matching() {
        assert!(PARAGRAPH_RULES[0].matches(FULL_PARAGRAPH));
        assert!(!PARAGRAPH_RULES[0].matches(GYMNOSPERM_PARAGRAPH));
        assert!(PARAGRAPH_RULES[2].matches(GYMNOSPERM_PARAGRAPH));
    }

    #[test]
    fn test_select_paragraph_prefers_first_match() {
        let paragraphs = vec![
            "引用文献目录。".to_string(),
            FULL_PARAGRAPH.to_string(),
            GYMNOSPERM_PARAGRAPH.to_string(),
        ];
        let selected = extractor().select_paragraph(&paragraphs);
        assert_eq!(selected, Some(FULL_PARAGRAPH));
    }

    #[test]
    fn test_select_paragraph_gymnosperm_fallback() {
        let paragraphs = vec![GYMNOSPERM_PARAGRAPH.to_string()];
        assert_eq!(
            extractor().select_paragraph(&paragraphs),
            Some(GYMNOSPERM_PARAGRAPH)
        );
    }

    #[test]
    fn test_no_matching_paragraph_yields_blank_fields() {
        let html = "<html><body><p>引用文献目录。</p><p>图版说明。</p></body></html>";
        let fields = extractor().extract_morphology(html);
        assert_eq!(fields, MorphologyFields::default());
    }

    #[test]
    fn test_height_is_clause_bounded() {
        let fields = extractor().extract_fields(FULL_PARAGRAPH);
        // Stops at the comma, does not swallow the whole sentence
        assert_eq!(fields.body_height, "高30-150厘米");
    }

    #[test]
    fn test_dbh_extraction() {
        let fields = extractor().extract_fields(GYMNOSPERM_PARAGRAPH);
        assert_eq!(fields.dbh, "胸径1.5米");
    }

    #[test]
    fn test_stem_is_sentence_bounded() {
        let fields = extractor().extract_fields(FULL_PARAGRAPH);
        assert_eq!(fields.stem, "茎直立，粗壮，具条棱");
    }

    #[test]
    fn test_multiple_matches_are_joined() {
        let paragraph = "叶片菱状卵形。上部叶较小。花黄色。";
        let fields = extractor().extract_fields(paragraph);
        assert_eq!(fields.leaf, "叶片菱状卵形。 | 上部叶较小");
    }

    #[test]
    fn test_missing_field_is_empty_string() {
        let fields = extractor().extract_fields(GYMNOSPERM_PARAGRAPH);
        assert_eq!(fields.flower, "");
        assert_eq!(fields.host, "");
    }

    #[test]
    fn test_paragraphs_take_first_text_node() {
        let html = "<html><body>\
<p>first text<span>nested later</span></p>\
<p><b>bold first</b>after</p>\
</body></html>";
        let paragraphs = Extractor::paragraphs(html);
        assert_eq!(paragraphs, vec!["first text", "bold first"]);
    }

    #[test]
    fn test_namer_extraction() {
        let html = r#"<div id="sptitlel"><b>Stellaria</b> <b>media</b> (L.) Cyr. <span class="spantxt">繁缕</span></div>"#;
        let namer = extractor().extract_namer(html, "Stellaria", "media");
        assert_eq!(namer.as_deref(), Some("(L.) Cyr."));
    }

    #[test]
    fn test_namer_absent_is_none() {
        let html = "<html><body><p>nothing here</p></body></html>";
        assert!(extractor()
            .extract_namer(html, "Stellaria", "media")
            .is_none());
    }

    #[test]
    fn test_namer_with_regex_metacharacters_in_name() {
        // Regex metacharacters in the name must be escaped, not compiled
        let html = r#"<b>Rosa</b> <b>multiflora var. cathayensis</b> Rehd. et Wils. <span>"#;
        let namer = extractor().extract_namer(html, "Rosa", "multiflora var. cathayensis");
        assert_eq!(namer.as_deref(), Some("Rehd. et Wils."));
    }
}
