//! Strip page rendering
//!
//! Builds a fresh one-page document sized to the plan and paints the source
//! content into its top-left content rectangle.

use crate::layout::{LayoutPlan, placement_matrix};
use crate::options::RasterOptions;
use crate::types::{InputPage, Result, StripError};
use log::debug;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::raster::create_image_xobject;
use super::xobject::{create_image_form, create_page_xobject};

/// Name of the placed source form in the page resources
const CONTENT_XOBJECT: &str = "P0";

/// Decoded source content, as produced by the source loader
#[derive(Debug, Clone)]
pub enum RawContent {
    /// A parsed PDF and the page to reproduce
    Pdf {
        document: Document,
        page_id: ObjectId,
    },
    /// A decoded raster image in its stored pixel orientation
    Raster(image::DynamicImage),
}

/// The finished single-page strip.
///
/// Created once by `render` and never modified afterwards.
#[derive(Debug, Clone)]
pub struct OutputDocument {
    document: Document,
    plan: LayoutPlan,
}

impl OutputDocument {
    pub fn plan(&self) -> &LayoutPlan {
        &self.plan
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Serialize the document to PDF bytes
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        let mut document = self.document;
        let mut writer = Vec::new();
        document.save_to(&mut writer)?;
        Ok(writer)
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Render `content` onto a new strip page using default raster settings.
pub fn render(input: &InputPage, content: &RawContent, plan: &LayoutPlan) -> Result<OutputDocument> {
    render_with_options(input, content, plan, &RasterOptions::default())
}

/// Render `content` onto a new strip page.
///
/// # Arguments
/// * `input` - Geometry of the source page the plan was resolved from
/// * `content` - The decoded source content
/// * `plan` - The resolved layout
/// * `raster` - Conversion settings, only used for raster content
pub fn render_with_options(
    input: &InputPage,
    content: &RawContent,
    plan: &LayoutPlan,
    raster: &RasterOptions,
) -> Result<OutputDocument> {
    if input.effective_bounds() != plan.effective_bounds {
        return Err(StripError::Geometry(format!(
            "layout was resolved for bounds {:?}, page has {:?}",
            plan.effective_bounds,
            input.effective_bounds()
        )));
    }

    let mut output = Document::with_version("1.7");
    let pages_id = output.new_object_id();

    let bbox = plan.effective_bounds;
    let form_id = match content {
        RawContent::Pdf { document, page_id } => {
            create_page_xobject(&mut output, document, *page_id, &bbox)?
        }
        RawContent::Raster(image) => {
            if image.width() == 0 || image.height() == 0 {
                return Err(StripError::ContentDecode("image has no pixels".to_string()));
            }
            let image_id = create_image_xobject(&mut output, image, plan, raster)?;
            create_image_form(&mut output, image_id, &input.media_box, &bbox)
        }
    };

    let content_ops = generate_placement_command(input, plan);
    debug!("placement: {}", content_ops.trim_end());
    let content_id = output.add_object(Stream::new(Dictionary::new(), content_ops.into_bytes()));

    let mut xobjects = Dictionary::new();
    xobjects.set(CONTENT_XOBJECT, Object::Reference(form_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(plan.page_width),
            Object::Real(plan.page_length),
        ]),
    );
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));
    let page_id = output.add_object(page_dict);

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ("Count", Object::Integer(1)),
    ]);
    output.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    output.trailer.set("Root", catalog_id);
    output.compress();

    Ok(OutputDocument {
        document: output,
        plan: plan.clone(),
    })
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Content stream that clips to the content rectangle and paints the source form.
fn generate_placement_command(input: &InputPage, plan: &LayoutPlan) -> String {
    let clip = plan.content_rect();
    let matrix = placement_matrix(input, plan);
    format!(
        "q {} {} {} {} re W n {} cm /{} Do Q\n",
        clip.x, clip.y, clip.width, clip.height, matrix, CONTENT_XOBJECT
    )
}
