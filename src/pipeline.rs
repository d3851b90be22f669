use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use chrono::{Datelike, Timelike};

use crate::{
    assets::{decode_template, encode_png},
    config::{LayoutConfig, RunConfig},
    foundation::error::{CaptionError, CaptionResult},
    render::{compose, font::FontEngine},
    text::{line_capacity, title_for, wrap},
};

/// Renders a caption card and returns the encoded PNG bytes.
///
/// Stages run in order and the first failure is returned: text check, font parse,
/// template decode, wrap, title, compose, encode.
pub fn run<E, T>(
    engine: &mut E,
    font_bytes: &[u8],
    template_bytes: &[u8],
    raw_text: &str,
    now: &T,
    layout: &LayoutConfig,
) -> CaptionResult<Vec<u8>>
where
    E: FontEngine,
    T: Datelike + Timelike,
{
    ensure_text(raw_text)?;
    layout.validate()?;
    let font = engine.parse(font_bytes)?;
    render_with_font(engine, &font, template_bytes, raw_text, now, layout)
}

/// File-backed variant of [`run`]. The output is written atomically, and only after
/// encoding succeeded.
pub fn run_to_file<E, T>(
    engine: &mut E,
    cfg: &RunConfig,
    now: &T,
    layout: &LayoutConfig,
) -> CaptionResult<()>
where
    E: FontEngine,
    T: Datelike + Timelike,
{
    ensure_text(&cfg.text)?;
    layout.validate()?;

    let font_bytes = read_file(&cfg.font_path)?;
    let font = engine.parse(&font_bytes)?;
    drop(font_bytes);

    let template_bytes = read_file(&cfg.template_path)?;
    let png = render_with_font(engine, &font, &template_bytes, &cfg.text, now, layout)?;
    write_atomic(&cfg.output_path, &png)?;

    tracing::info!(out = %cfg.output_path.display(), bytes = png.len(), "wrote caption");
    Ok(())
}

#[tracing::instrument(skip_all, fields(text_len = raw_text.len()))]
fn render_with_font<E, T>(
    engine: &mut E,
    font: &E::Font,
    template_bytes: &[u8],
    raw_text: &str,
    now: &T,
    layout: &LayoutConfig,
) -> CaptionResult<Vec<u8>>
where
    E: FontEngine,
    T: Datelike + Timelike,
{
    let template = decode_template(template_bytes)?;
    let capacity = line_capacity(template.width(), layout)?;
    let lines = wrap(raw_text, capacity, layout.wrap_unit)?;
    tracing::debug!(
        template_width = template.width(),
        template_height = template.height(),
        capacity,
        lines = lines.len(),
        "wrapped body text"
    );

    let title = title_for(now);
    let surface = compose(engine, font, &template, &title, &lines, layout)?;
    encode_png(&surface)
}

fn ensure_text(text: &str) -> CaptionResult<()> {
    if text.is_empty() {
        return Err(CaptionError::precondition("texts is empty"));
    }
    Ok(())
}

fn read_file(path: &Path) -> CaptionResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| CaptionError::io(path, e))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> CaptionResult<()> {
    let dir: PathBuf = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| CaptionError::io(&dir, e))?;
    if let Err(e) = tmp.write_all(bytes).and_then(|()| tmp.flush()) {
        return Err(CaptionError::io(tmp.path(), e));
    }
    tmp.persist(path)
        .map_err(|e| CaptionError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.png");
        std::fs::write(&out, b"old").unwrap();

        write_atomic(&out, b"new").unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), b"new");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn write_atomic_into_missing_dir_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nope").join("out.png");
        let err = write_atomic(&out, b"x").unwrap_err();
        assert!(matches!(err, CaptionError::Io { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn read_file_reports_path() {
        let err = read_file(Path::new("does/not/exist.ttf")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.ttf"));
    }
}
