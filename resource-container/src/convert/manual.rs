//! Converter for legacy manual resources (translation academy).

use std::collections::{BTreeMap, HashMap};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use super::{write_chunk_file, ConvertContext, ConvertResult, TocEntry};

/// Matches markdown-style links in the manual outline, capturing the target.
const LINK_PATTERN: &str = r"\[[^\[\]]*\]\s*\(([^()]*)\)";

#[derive(Debug, Deserialize)]
struct ManualSource {
    #[serde(default)]
    articles: Vec<Article>,
    #[serde(default)]
    toc: String,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    question: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    recommend: Vec<String>,
    #[serde(default)]
    depend: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ArticleConfig {
    recommended: Vec<String>,
    dependencies: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ManualConfig {
    content: BTreeMap<String, ArticleConfig>,
}

/// Convert a manual (`ta`).
///
/// Article, recommendation and dependency ids use hyphens in containers
/// while the legacy api used underscores. Each article becomes a chapter
/// with `title`, `sub-title` and `01` (body) chunks. The table of contents
/// is rebuilt from the outline string: articles appear in the order they
/// are first linked, and links to unknown articles are dropped.
pub(super) async fn convert(
    ctx: &ConvertContext<'_>,
    data: &str,
    toc: &mut Vec<TocEntry>,
) -> ConvertResult<Value> {
    let source: ManualSource = serde_json::from_str(data)?;

    let mut content: BTreeMap<String, ArticleConfig> = BTreeMap::new();
    let mut entries: HashMap<String, TocEntry> = HashMap::new();

    for article in &source.articles {
        let id = article.id.replace('_', "-");
        let recommended: Vec<String> = article
            .recommend
            .iter()
            .map(|r| r.replace('_', "-"))
            .collect();
        let dependencies: Vec<String> =
            article.depend.iter().map(|d| d.replace('_', "-")).collect();

        let article_dir = ctx.content_dir.join(&id);
        write_chunk_file(&article_dir, "title", ctx.ext, &article.title).await?;
        write_chunk_file(&article_dir, "sub-title", ctx.ext, &article.question).await?;
        write_chunk_file(&article_dir, "01", ctx.ext, &article.text).await?;

        if !recommended.is_empty() || !dependencies.is_empty() {
            content.insert(
                id.clone(),
                ArticleConfig {
                    recommended,
                    dependencies,
                },
            );
        }

        entries.insert(
            id.clone(),
            TocEntry {
                chapter: id,
                chunks: vec![
                    "title".to_string(),
                    "sub-title".to_string(),
                    "01".to_string(),
                ],
            },
        );
    }

    // the outline is the authority on ordering, not the articles array
    let link = Regex::new(LINK_PATTERN).expect("valid link pattern");
    for caps in link.captures_iter(&source.toc) {
        let key = caps[1].replace('_', "-");
        if let Some(entry) = entries.get(&key) {
            toc.push(entry.clone());
        }
    }

    Ok(serde_yaml::to_value(ManualConfig { content })?)
}
