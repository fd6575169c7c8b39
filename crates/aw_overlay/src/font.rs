//! Loading a TrueType/OpenType font into egui.

use std::sync::Arc;

use aw_core::assets::{read_asset, AssetKind, AssetLoadError};
use std::path::Path;

/// Family name the welcome message is drawn with.
pub const WELCOME_FONT: &str = "welcome";

/// Read a font file and check it carries a known font signature. egui aborts
/// on fonts it cannot parse, so anything unrecognised is rejected here.
pub fn load_font(path: &Path) -> Result<Vec<u8>, AssetLoadError> {
    let bytes = read_asset(AssetKind::Font, path)?;
    if !has_font_signature(&bytes) {
        return Err(AssetLoadError::new(
            AssetKind::Font,
            path,
            "not a TrueType or OpenType font",
        ));
    }
    Ok(bytes)
}

pub fn has_font_signature(bytes: &[u8]) -> bool {
    matches!(
        bytes.get(..4),
        Some([0x00, 0x01, 0x00, 0x00]) | Some(b"true") | Some(b"OTTO") | Some(b"ttcf")
    )
}

/// Font definitions with `bytes` registered as the [`WELCOME_FONT`] family.
/// Without bytes the family falls back to egui's proportional font.
pub fn font_definitions(bytes: Option<Vec<u8>>) -> egui::FontDefinitions {
    let mut fonts = egui::FontDefinitions::default();
    let mut family = match bytes {
        Some(bytes) => {
            fonts.font_data.insert(
                WELCOME_FONT.to_owned(),
                Arc::new(egui::FontData::from_owned(bytes)),
            );
            vec![WELCOME_FONT.to_owned()]
        }
        None => Vec::new(),
    };
    if let Some(proportional) = fonts.families.get(&egui::FontFamily::Proportional) {
        family.extend(proportional.iter().cloned());
    }
    fonts
        .families
        .insert(egui::FontFamily::Name(WELCOME_FONT.into()), family);
    fonts
}
