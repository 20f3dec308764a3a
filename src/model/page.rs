use serde::{Deserialize, Serialize};

/// Response of the MediaWiki `action=parse&format=json` endpoint, reduced to
/// the fields the timeline needs.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchPage {
    pub parse: ParsedPage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParsedPage {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub pageid: u64,
    #[serde(default)]
    pub revid: u64,
    pub text: PageText,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageText {
    #[serde(rename = "*")]
    pub html: String,
}

/// Metadata of the wiki revision the HTML was rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub pageid: u64,
    pub revid: u64,
}

impl MatchPage {
    /// Split the envelope into its revision metadata and raw HTML.
    pub fn into_parts(self) -> (PageMeta, String) {
        let ParsedPage {
            title,
            pageid,
            revid,
            text,
        } = self.parse;
        (
            PageMeta {
                title,
                pageid,
                revid,
            },
            text.html,
        )
    }
}
