//! Converter for legacy book resources (scripture and OBS).
//!
//! Book payloads are chaptered: each chapter carries a title, an optional
//! reference, and a list of frames (verse-range units) whose compound ids
//! encode the chunk slug.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::naming::{localize_chapter_title, normalize_slug};

use super::{write_chunk_file, ConvertContext, ConvertError, ConvertResult, TocEntry};

/// Matches the first verse marker in a frame, capturing the verse range.
const VERSE_PATTERN: &str = r#"<verse\s+number="(\d+(?:-\d+)?)"\s+style="v"\s*/>"#;

#[derive(Debug, Deserialize)]
struct BookSource {
    #[serde(default)]
    chapters: Vec<ChapterSource>,
}

#[derive(Debug, Deserialize)]
struct ChapterSource {
    #[serde(default)]
    number: String,
    #[serde(default)]
    title: String,
    #[serde(default, rename = "ref")]
    reference: String,
    #[serde(default)]
    frames: Vec<FrameSource>,
}

#[derive(Debug, Deserialize)]
struct FrameSource {
    #[serde(default)]
    id: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct BookConfig {
    content: BTreeMap<String, BTreeMap<String, ChunkConfig>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<MediaConfig>,
}

#[derive(Debug, Serialize)]
struct ChunkConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    words: Vec<String>,
}

#[derive(Debug, Serialize)]
struct MediaConfig {
    image: ImageMedia,
}

#[derive(Debug, Serialize)]
struct ImageMedia {
    mime_type: String,
    size: u64,
    url: String,
}

/// OBS ships a companion image bundle alongside the text.
fn obs_media() -> MediaConfig {
    MediaConfig {
        image: ImageMedia {
            mime_type: "image/jpg".to_string(),
            size: 37620940,
            url: "https://api.unfoldingword.org/obs/jpg/1/en/obs-images-360px.zip".to_string(),
        },
    }
}

pub(super) async fn convert(
    ctx: &ConvertContext<'_>,
    data: &str,
    toc: &mut Vec<TocEntry>,
) -> ConvertResult<Value> {
    let source: BookSource = serde_json::from_str(data)?;
    let verse_marker = Regex::new(VERSE_PATTERN).expect("valid verse pattern");

    let mut content: BTreeMap<String, BTreeMap<String, ChunkConfig>> = BTreeMap::new();

    for chapter in source.chapters {
        let chapter_slug = normalize_slug(&chapter.number)?;
        let chapter_dir = ctx.content_dir.join(&chapter_slug);
        let mut entry = TocEntry {
            chapter: chapter_slug.clone(),
            chunks: vec!["title".to_string()],
        };
        let mut chapter_config: BTreeMap<String, ChunkConfig> = BTreeMap::new();

        let title = if chapter.title.is_empty() {
            localize_chapter_title(&ctx.language.slug, &chapter_slug)
        } else {
            chapter.title.clone()
        };
        write_chunk_file(&chapter_dir, "title", ctx.ext, &title).await?;

        for frame in &chapter.frames {
            let chunk_slug = frame_slug(&verse_marker, frame)?;

            if let Some(words) = ctx.words_for(&chapter_slug, &chunk_slug) {
                if !words.is_empty() {
                    chapter_config.insert(chunk_slug.clone(), ChunkConfig { words });
                }
            }

            entry.chunks.push(chunk_slug.clone());
            write_chunk_file(&chapter_dir, &chunk_slug, ctx.ext, &frame.text).await?;
        }

        if !chapter.reference.is_empty() {
            write_chunk_file(&chapter_dir, "reference", ctx.ext, &chapter.reference).await?;
            entry.chunks.push("reference".to_string());
        }

        if !chapter_config.is_empty() {
            content.insert(chapter_slug, chapter_config);
        }
        toc.push(entry);
    }

    let media = if ctx.project.slug == "obs" {
        Some(obs_media())
    } else {
        None
    };

    Ok(serde_yaml::to_value(BookConfig { content, media })?)
}

/// Derive the chunk slug from a frame's compound id.
///
/// Some legacy frames carry a bogus `00` chunk segment; for those the real
/// slug is recovered from the first verse number in the frame's verse
/// marker. A `00` frame without a verse marker is malformed.
fn frame_slug(verse_marker: &Regex, frame: &FrameSource) -> ConvertResult<String> {
    let segment = frame
        .id
        .split('-')
        .nth(1)
        .map(str::trim)
        .ok_or_else(|| {
            ConvertError::MalformedSource(format!("frame id '{}' has no chunk segment", frame.id))
        })?;
    let slug = normalize_slug(segment)?;
    if slug != "00" {
        return Ok(slug);
    }

    let range = verse_marker
        .captures(&frame.text)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| {
            ConvertError::MalformedSource(format!("frame '{}' has no verse marker", frame.id))
        })?;
    let first = range.split('-').next().unwrap_or(&range);
    Ok(normalize_slug(first)?)
}
