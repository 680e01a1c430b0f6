//! Converters for legacy translation helps (notes and questions).

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_yaml::Value;

use crate::naming::normalize_slug;

use super::{split_compound_id, write_chunk_file, ConvertContext, ConvertResult};

#[derive(Debug, Deserialize)]
struct NotesChunk {
    #[serde(default)]
    id: String,
    #[serde(default)]
    tn: Vec<Note>,
}

#[derive(Debug, Deserialize)]
struct Note {
    #[serde(default, rename = "ref")]
    reference: String,
    #[serde(default)]
    text: String,
}

/// Convert translation notes (`tn`).
///
/// Notes are grouped by the chapter-chunk id and concatenated into one
/// body per chunk. Malformed ids, chunk id `00`, and chunks whose trimmed
/// body is empty are skipped.
pub(super) async fn convert_notes(ctx: &ConvertContext<'_>, data: &str) -> ConvertResult<Value> {
    let chunks: Vec<NotesChunk> = serde_json::from_str(data)?;

    for chunk in chunks {
        if chunk.tn.is_empty() {
            continue;
        }
        let Some((chapter, chunk_id)) = split_compound_id(&chunk.id) else {
            continue;
        };
        let chapter_slug = normalize_slug(chapter)?;
        let chunk_slug = normalize_slug(chunk_id)?;
        if chunk_slug == "00" {
            continue;
        }

        let mut body = String::new();
        for note in &chunk.tn {
            body.push_str(&format!("\n\n#{}\n\n{}", note.reference, note.text));
        }
        let body = body.trim();
        if body.is_empty() {
            continue;
        }

        write_chunk_file(
            &ctx.content_dir.join(&chapter_slug),
            &chunk_slug,
            ctx.ext,
            body,
        )
        .await?;
    }

    Ok(Value::Mapping(serde_yaml::Mapping::new()))
}

#[derive(Debug, Deserialize)]
struct QuestionsChapter {
    #[serde(default)]
    id: String,
    #[serde(default)]
    cq: Vec<Question>,
}

#[derive(Debug, Deserialize)]
struct Question {
    #[serde(default)]
    q: String,
    #[serde(default)]
    a: String,
    #[serde(default, rename = "ref")]
    refs: Vec<String>,
}

/// Convert translation questions (`tq`).
///
/// Each question lists the chunks it applies to; the question/answer body
/// is appended to every referenced chunk, and one file is written per
/// resulting chunk. Referenced chapter segments are ignored: all chunks
/// land under the chapter entry that carried the question.
pub(super) async fn convert_questions(
    ctx: &ConvertContext<'_>,
    data: &str,
) -> ConvertResult<Value> {
    let chapters: Vec<QuestionsChapter> = serde_json::from_str(data)?;

    for chapter in chapters {
        if chapter.cq.is_empty() {
            continue;
        }
        let chapter_slug = normalize_slug(&chapter.id)?;
        let chapter_dir = ctx.content_dir.join(&chapter_slug);

        let mut bodies: BTreeMap<String, String> = BTreeMap::new();
        for question in &chapter.cq {
            let text = format!("\n\n#{}\n\n{}", question.q, question.a);
            for reference in &question.refs {
                let Some((_, chunk_id)) = split_compound_id(reference) else {
                    continue;
                };
                let chunk_slug = normalize_slug(chunk_id)?;
                bodies.entry(chunk_slug).or_default().push_str(&text);
            }
        }

        for (chunk_slug, body) in bodies {
            write_chunk_file(&chapter_dir, &chunk_slug, ctx.ext, body.trim()).await?;
        }
    }

    Ok(Value::Mapping(serde_yaml::Mapping::new()))
}
