//! Converter for legacy dictionary resources (translation words).

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use super::{write_chunk_file, ConvertContext, ConvertResult};

#[derive(Debug, Deserialize)]
struct WordEntry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    term: String,
    #[serde(default)]
    def: String,
    #[serde(default)]
    def_title: String,
    #[serde(default)]
    cf: Vec<String>,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    ex: Vec<Example>,
}

#[derive(Debug, Deserialize)]
struct Example {
    #[serde(default, rename = "ref")]
    reference: String,
}

#[derive(Debug, Serialize)]
struct WordConfig {
    def_title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    see_also: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    aliases: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    examples: Vec<String>,
}

/// Convert a dictionary (`tw`).
///
/// Every term becomes its own chapter directory holding a single `01`
/// chunk with the term heading and definition. Cross references, aliases
/// and example references accumulate in the config sidecar.
pub(super) async fn convert(ctx: &ConvertContext<'_>, data: &str) -> ConvertResult<Value> {
    let words: Vec<WordEntry> = serde_json::from_str(data)?;

    let mut config: BTreeMap<String, WordConfig> = BTreeMap::new();

    for word in words {
        if word.id.is_empty() {
            continue;
        }

        let body = format!("#{}\n\n{}", word.term, word.def);
        write_chunk_file(&ctx.content_dir.join(&word.id), "01", ctx.ext, &body).await?;

        // related terms are case-folded to their first pipe segment and
        // de-duplicated in first-seen order
        let mut seen = HashSet::new();
        let mut see_also = Vec::new();
        for related in &word.cf {
            let id = related
                .split('|')
                .next()
                .unwrap_or(related)
                .to_lowercase();
            if seen.insert(id.clone()) {
                see_also.push(id);
            }
        }

        let aliases = word
            .aliases
            .iter()
            .flat_map(|alias| alias.split(','))
            .map(|alias| alias.trim().to_string())
            .collect();

        let examples = word.ex.iter().map(|ex| ex.reference.clone()).collect();

        config.insert(
            word.id,
            WordConfig {
                def_title: word.def_title,
                see_also,
                aliases,
                examples,
            },
        );
    }

    Ok(serde_yaml::to_value(config)?)
}
