use std::path::Path;

use anyhow::Context;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use prov_core::entities::ManualData;
use prov_llm::ImagePayload;
use prov_pipeline::LookupRequest;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::LookupArgs;
use crate::output::output;

/// Handle `prov lookup`.
pub async fn handle(args: &LookupArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config()?;
    let pipeline = bootstrap::build_pipeline(&config)?;

    let image = args.image.as_deref().map(read_image).transpose()?;
    let request = LookupRequest {
        image,
        manual: manual_data(args),
    };

    let determination = pipeline.run(request).await;
    output(&determination, flags.format)
}

fn manual_data(args: &LookupArgs) -> ManualData {
    ManualData {
        brand: args.brand.clone(),
        product_name: args.product.clone(),
        country_of_origin: args.country.clone(),
        confidence: args.manual_confidence.map(f64::from),
        ..ManualData::default()
    }
}

/// Format tag for an image path: the lowercase extension, `jpeg` when absent.
fn image_format(path: &Path) -> String {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        None | Some("") | Some("jpg") => String::from("jpeg"),
        Some(ext) => ext.to_string(),
    }
}

fn read_image(path: &Path) -> anyhow::Result<ImagePayload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read image {}", path.display()))?;
    Ok(ImagePayload {
        base64: STANDARD.encode(bytes),
        format: image_format(path),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn format_comes_from_extension() {
        assert_eq!(image_format(Path::new("pack.PNG")), "png");
        assert_eq!(image_format(Path::new("pack.jpg")), "jpeg");
        assert_eq!(image_format(Path::new("pack.webp")), "webp");
        assert_eq!(image_format(Path::new("pack")), "jpeg");
    }

    #[test]
    fn image_is_base64_encoded() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"\x89PNG").unwrap();
        let payload = read_image(file.path()).unwrap();
        assert_eq!(payload.format, "png");
        assert_eq!(payload.base64, "iVBORw==");
    }

    #[test]
    fn missing_image_is_an_error() {
        assert!(read_image(Path::new("/nonexistent/pack.jpg")).is_err());
    }

    #[test]
    fn manual_fields_map_from_flags() {
        let args = LookupArgs {
            product: Some("Oreo".into()),
            brand: Some("Oreo".into()),
            image: None,
            country: Some("United States".into()),
            manual_confidence: Some(80),
        };
        let manual = manual_data(&args);
        assert_eq!(manual.confidence, Some(80.0));
        assert_eq!(manual.country_of_origin.as_deref(), Some("United States"));
        assert!(manual.has_subject());
    }
}
