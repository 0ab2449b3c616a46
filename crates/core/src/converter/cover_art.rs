//! Cover art lookup and embedding.

use std::fs::File;
use std::path::{Path, PathBuf};

use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::picture::{Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::Tag;

use super::error::ConverterError;

/// Cover art file stems, in priority order.
const COVER_STEMS: &[&str] = &["front", "folder", "cover"];

/// Cover art extensions, in priority order within a stem.
const COVER_EXTENSIONS: &[&str] = &["jpg", "png"];

/// Finds the first conventionally named cover image in `dir`.
pub fn find_cover_in(dir: &Path) -> Option<PathBuf> {
    COVER_STEMS
        .iter()
        .flat_map(|stem| {
            COVER_EXTENSIONS
                .iter()
                .map(move |ext| dir.join(format!("{}.{}", stem, ext)))
        })
        .find(|candidate| candidate.is_file())
}

/// Finds cover art for an output file, looking beside the output first and
/// then beside the source.
pub fn find_cover_art(output: &Path, source: &Path) -> Option<PathBuf> {
    let output_dir = output.parent()?;
    find_cover_in(output_dir).or_else(|| {
        source
            .parent()
            .filter(|dir| *dir != output_dir)
            .and_then(find_cover_in)
    })
}

/// Embeds `image` as the front cover of `audio`, replacing any existing front cover.
///
/// Blocking; call from `spawn_blocking` in async code.
pub fn embed_cover_art(audio: &Path, image: &Path) -> Result<(), ConverterError> {
    let mut reader = File::open(image).map_err(|e| {
        ConverterError::cover_art_failed(format!("cannot open {}: {}", image.display(), e))
    })?;
    let mut picture = Picture::from_reader(&mut reader)
        .map_err(|e| ConverterError::cover_art_failed(format!("{}: {}", image.display(), e)))?;
    picture.set_pic_type(PictureType::CoverFront);

    let mut tagged_file = Probe::open(audio)
        .and_then(|probe| probe.read())
        .map_err(|e| ConverterError::cover_art_failed(format!("{}: {}", audio.display(), e)))?;

    if tagged_file.primary_tag().is_none() {
        let tag_type = tagged_file.primary_tag_type();
        tagged_file.insert_tag(Tag::new(tag_type));
    }

    let tag = tagged_file
        .primary_tag_mut()
        .ok_or_else(|| ConverterError::cover_art_failed("no writable tag"))?;
    tag.remove_picture_type(PictureType::CoverFront);
    tag.push_picture(picture);

    tagged_file
        .save_to_path(audio, WriteOptions::default())
        .map_err(|e| ConverterError::cover_art_failed(format!("{}: {}", audio.display(), e)))
}
