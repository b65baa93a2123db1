use anyhow::{anyhow, Result};

/// Maps a drive-letter Windows path onto the subsystem's `/mnt/<drive>` mount.
pub fn translate_windows_path(native: &str) -> Result<String> {
    let trimmed = native.trim().trim_matches('"');
    let trimmed = trimmed.strip_prefix(r"\\?\").unwrap_or(trimmed);

    if trimmed.starts_with(r"\\") || trimmed.starts_with("//") {
        return Err(anyhow!(
            "network paths cannot be opened in the Linux subsystem: {native}"
        ));
    }

    let mut chars = trimmed.chars();
    let (Some(drive), Some(':')) = (chars.next(), chars.next()) else {
        return Err(anyhow!("expected an absolute drive path: {native}"));
    };
    if !drive.is_ascii_alphabetic() {
        return Err(anyhow!("expected an absolute drive path: {native}"));
    }

    let rest = chars.as_str();
    if !(rest.is_empty() || rest.starts_with(['\\', '/'])) {
        return Err(anyhow!(
            "drive-relative paths are not supported: {native}"
        ));
    }

    let segments = rest
        .split(['\\', '/'])
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>();

    let mut translated = format!("/mnt/{}", drive.to_ascii_lowercase());
    for segment in segments {
        translated.push('/');
        translated.push_str(segment);
    }
    Ok(translated)
}

/// Window title fragment for a directory: its final segment, or `Root`.
pub fn folder_title(native: &str) -> String {
    let trimmed = native.trim().trim_matches('"');
    trimmed
        .split(['\\', '/'])
        .filter(|segment| !segment.is_empty())
        .last()
        .filter(|segment| !(segment.len() == 2 && segment.ends_with(':')))
        .map(str::to_string)
        .unwrap_or_else(|| "Root".to_string())
}
