use anyhow::{Context, Result, bail};
use std::sync::Arc;

const ZIP_SIGNATURE: [u8; 4] = [b'P', b'K', 0x03, 0x04];
const EMPTY_ZIP_SIGNATURE: [u8; 4] = [b'P', b'K', 0x05, 0x06];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkinKind {
    /// A full skin archive, kept as-is for the renderer to unpack.
    Archive { bytes: Arc<[u8]> },
    /// A lone image used as an ad-hoc skin.
    Image { width: u32, height: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skin {
    pub name: String,
    pub kind: SkinKind,
}

impl Skin {
    pub fn is_archive(&self) -> bool {
        matches!(self.kind, SkinKind::Archive { .. })
    }
}

/// Parses fetched bytes into a skin. Runs on a worker thread.
pub trait SkinLoader: Send + Sync {
    fn parse(&self, name: &str, bytes: &[u8]) -> Result<Skin>;
}

pub struct BasicSkinLoader;

impl SkinLoader for BasicSkinLoader {
    fn parse(&self, name: &str, bytes: &[u8]) -> Result<Skin> {
        if bytes.is_empty() {
            bail!("Skin \"{name}\" is empty");
        }

        if bytes.starts_with(&ZIP_SIGNATURE) || bytes.starts_with(&EMPTY_ZIP_SIGNATURE) {
            return Ok(Skin {
                name: name.to_string(),
                kind: SkinKind::Archive {
                    bytes: Arc::from(bytes),
                },
            });
        }

        let image = image::load_from_memory(bytes)
            .with_context(|| format!("\"{name}\" is neither a skin archive nor an image"))?;

        Ok(Skin {
            name: name.to_string(),
            kind: SkinKind::Image {
                width: image.width(),
                height: image.height(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn zip_signature_is_an_archive() {
        let mut bytes = ZIP_SIGNATURE.to_vec();
        bytes.extend_from_slice(&[0u8; 26]);

        let skin = BasicSkinLoader.parse("base-2.91.wsz", &bytes).unwrap();
        assert!(skin.is_archive());
        assert_eq!(skin.name, "base-2.91.wsz");
    }

    #[test]
    fn image_becomes_adhoc_skin() {
        let img = image::RgbImage::new(275, 116);
        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, image::ImageFormat::Png).unwrap();

        let skin = BasicSkinLoader.parse("main.png", png.get_ref()).unwrap();
        assert_eq!(
            skin.kind,
            SkinKind::Image {
                width: 275,
                height: 116
            }
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(BasicSkinLoader.parse("x.wsz", b"not a skin").is_err());
        assert!(BasicSkinLoader.parse("x.wsz", &[]).is_err());
    }
}
