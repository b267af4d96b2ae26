//! Packages an assembled [`DeckPresentation`] as a `.pptx` file.
//!
//! Every page becomes one slide on a single blank layout. Shapes, text and
//! pictures are written with absolute positions taken from the page model.
//! Images are loaded here, once per distinct reference; an image that fails to
//! load is replaced by a labelled placeholder frame.

use log::{info, warn};
use std::collections::HashMap;

use crate::config::RenderConfig;
use crate::converters::ooxml::{
    app_properties, core_properties, package_relationships, xml_safe, ContentTypes,
    MediaLibrary, Package, Relationships, XmlPart, NS_DRAWING, NS_OFFICE_REL, REL_IMAGE, REL_THEME,
};
use crate::errors::Result;
use crate::images::ImageLoader;
use crate::models::colors::{RgbColor, SolidFill};
use crate::models::common::{inches_to_emu, Frame, EMU_PER_INCH, PT_PER_INCH};
use crate::models::elements::{PageElement, PageElementKind};
use crate::models::image::{Image, ImageRef};
use crate::models::page::DeckPage;
use crate::models::presentation::DeckPresentation;
use crate::models::shape::{Outline, Shape, ShapeType};
use crate::models::text::{Alignment, TextContent, TextStyle, VerticalAlign};

const NS_PRESENTATION: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";

const PLACEHOLDER_FILL: RgbColor = RgbColor::hex(0xEEEEEE);
const PLACEHOLDER_LINE: RgbColor = RgbColor::hex(0x9E9E9E);
const PLACEHOLDER_TEXT: RgbColor = RgbColor::hex(0x616161);

/// Serializes a deck into `.pptx` bytes.
///
/// # Arguments
///
/// * `deck` - The assembled deck.
/// * `loader` - Produces bytes for every image reference on the pages.
/// * `config` - Supplies the theme font and the author written to the metadata.
///
/// # Returns
///
/// The complete zip package. Image load failures never fail the call; packaging
/// errors do.
pub fn write_pptx<L: ImageLoader + ?Sized>(
    deck: &DeckPresentation,
    loader: &L,
    config: &RenderConfig,
) -> Result<Vec<u8>> {
    let mut package = Package::new();
    let mut content_types = ContentTypes::new();
    let mut media = MediaLibrary::new(loader, "ppt/media");

    for (i, page) in deck.slides.iter().enumerate() {
        let number = i + 1;
        let (slide_xml, rels) = slide_part(page, &mut media)?;
        package.add(&format!("ppt/slides/slide{number}.xml"), &slide_xml)?;
        package.add(
            &format!("ppt/slides/_rels/slide{number}.xml.rels"),
            &rels.to_xml()?,
        )?;
        content_types.add_override(format!("/ppt/slides/slide{number}.xml"), CT_SLIDE);
    }

    media.write_into(&mut package, &mut content_types)?;

    content_types.add_override("/ppt/presentation.xml", CT_PRESENTATION);
    content_types.add_override("/ppt/slideMasters/slideMaster1.xml", CT_MASTER);
    content_types.add_override("/ppt/slideLayouts/slideLayout1.xml", CT_LAYOUT);
    content_types.add_override("/ppt/theme/theme1.xml", CT_THEME);

    package.add("[Content_Types].xml", &content_types.to_xml()?)?;
    package.add("_rels/.rels", &package_relationships("ppt/presentation.xml")?)?;
    package.add("docProps/core.xml", &core_properties(&deck.title, &config.author)?)?;
    package.add(
        "docProps/app.xml",
        &app_properties("LessonLaunch", &[("Slides", deck.slides.len())])?,
    )?;

    let mut presentation_rels = Relationships::new();
    let master_rel = presentation_rels.add("slideMaster", "slideMasters/slideMaster1.xml");
    let slide_rels: Vec<String> = (1..=deck.slides.len())
        .map(|n| presentation_rels.add("slide", format!("slides/slide{n}.xml")))
        .collect();
    presentation_rels.add(REL_THEME, "theme/theme1.xml");
    package.add(
        "ppt/presentation.xml",
        &presentation_part(deck, &master_rel, &slide_rels)?,
    )?;
    package.add(
        "ppt/_rels/presentation.xml.rels",
        &presentation_rels.to_xml()?,
    )?;

    let mut master_rels = Relationships::new();
    let layout_rel = master_rels.add("slideLayout", "../slideLayouts/slideLayout1.xml");
    master_rels.add(REL_THEME, "../theme/theme1.xml");
    package.add("ppt/slideMasters/slideMaster1.xml", &master_part(&layout_rel)?)?;
    package.add(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        &master_rels.to_xml()?,
    )?;

    let mut layout_rels = Relationships::new();
    layout_rels.add("slideMaster", "../slideMasters/slideMaster1.xml");
    package.add("ppt/slideLayouts/slideLayout1.xml", &layout_part()?)?;
    package.add(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        &layout_rels.to_xml()?,
    )?;

    package.add(
        "ppt/theme/theme1.xml",
        theme_part(&deck.theme_name, &config.font_face).as_bytes(),
    )?;

    let bytes = package.finish()?;
    info!(
        "Packaged deck '{}': {} slides, {} images, {} bytes",
        deck.title,
        deck.slides.len(),
        media.len(),
        bytes.len()
    );
    Ok(bytes)
}

// --- Presentation, master, layout, theme ---

fn presentation_part(
    deck: &DeckPresentation,
    master_rel: &str,
    slide_rels: &[String],
) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start(
        "p:presentation",
        &[
            ("xmlns:a", NS_DRAWING),
            ("xmlns:r", NS_OFFICE_REL),
            ("xmlns:p", NS_PRESENTATION),
            ("saveSubsetFonts", "1"),
        ],
    )?;
    xml.start("p:sldMasterIdLst", &[])?;
    xml.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", master_rel)])?;
    xml.end("p:sldMasterIdLst")?;

    xml.start("p:sldIdLst", &[])?;
    for (i, rel) in slide_rels.iter().enumerate() {
        let id = (256 + i).to_string();
        xml.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel.as_str())])?;
    }
    xml.end("p:sldIdLst")?;

    let cx = inches_to_emu(deck.page_size.width).to_string();
    let cy = inches_to_emu(deck.page_size.height).to_string();
    xml.empty(
        "p:sldSz",
        &[("cx", cx.as_str()), ("cy", cy.as_str()), ("type", "screen4x3")],
    )?;
    xml.empty("p:notesSz", &[("cx", cy.as_str()), ("cy", cx.as_str())])?;
    xml.end("p:presentation")?;
    Ok(xml.finish())
}

fn empty_shape_tree(xml: &mut XmlPart) -> Result<()> {
    xml.start("p:spTree", &[])?;
    group_properties(xml)?;
    xml.end("p:spTree")
}

fn group_properties(xml: &mut XmlPart) -> Result<()> {
    xml.start("p:nvGrpSpPr", &[])?;
    xml.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    xml.empty("p:cNvGrpSpPr", &[])?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvGrpSpPr")?;
    xml.empty("p:grpSpPr", &[])
}

fn master_part(layout_rel: &str) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start(
        "p:sldMaster",
        &[
            ("xmlns:a", NS_DRAWING),
            ("xmlns:r", NS_OFFICE_REL),
            ("xmlns:p", NS_PRESENTATION),
        ],
    )?;
    xml.start("p:cSld", &[])?;
    empty_shape_tree(&mut xml)?;
    xml.end("p:cSld")?;
    xml.empty(
        "p:clrMap",
        &[
            ("bg1", "lt1"),
            ("tx1", "dk1"),
            ("bg2", "lt2"),
            ("tx2", "dk2"),
            ("accent1", "accent1"),
            ("accent2", "accent2"),
            ("accent3", "accent3"),
            ("accent4", "accent4"),
            ("accent5", "accent5"),
            ("accent6", "accent6"),
            ("hlink", "hlink"),
            ("folHlink", "folHlink"),
        ],
    )?;
    xml.start("p:sldLayoutIdLst", &[])?;
    xml.empty("p:sldLayoutId", &[("id", "2147483649"), ("r:id", layout_rel)])?;
    xml.end("p:sldLayoutIdLst")?;
    xml.end("p:sldMaster")?;
    Ok(xml.finish())
}

fn layout_part() -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start(
        "p:sldLayout",
        &[
            ("xmlns:a", NS_DRAWING),
            ("xmlns:r", NS_OFFICE_REL),
            ("xmlns:p", NS_PRESENTATION),
            ("type", "blank"),
            ("preserve", "1"),
        ],
    )?;
    xml.start("p:cSld", &[("name", "Blank")])?;
    empty_shape_tree(&mut xml)?;
    xml.end("p:cSld")?;
    xml.start("p:clrMapOvr", &[])?;
    xml.empty("a:masterClrMapping", &[])?;
    xml.end("p:clrMapOvr")?;
    xml.end("p:sldLayout")?;
    Ok(xml.finish())
}

/// A minimal Office theme whose fonts are the configured face.
fn theme_part(name: &str, font_face: &str) -> String {
    let clean_name = xml_safe(name);
    let clean_font = xml_safe(font_face);
    let name = quick_xml::escape::escape(clean_name.as_ref());
    let font = quick_xml::escape::escape(clean_font.as_ref());
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="{NS_DRAWING}" name="{name}">
  <a:themeElements>
    <a:clrScheme name="{name}">
      <a:dk1><a:srgbClr val="000000"/></a:dk1>
      <a:lt1><a:srgbClr val="FFFFFF"/></a:lt1>
      <a:dk2><a:srgbClr val="44546A"/></a:dk2>
      <a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>
      <a:accent1><a:srgbClr val="4472C4"/></a:accent1>
      <a:accent2><a:srgbClr val="ED7D31"/></a:accent2>
      <a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>
      <a:accent4><a:srgbClr val="FFC000"/></a:accent4>
      <a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>
      <a:accent6><a:srgbClr val="70AD47"/></a:accent6>
      <a:hlink><a:srgbClr val="0563C1"/></a:hlink>
      <a:folHlink><a:srgbClr val="954F72"/></a:folHlink>
    </a:clrScheme>
    <a:fontScheme name="{name}">
      <a:majorFont><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>
      <a:minorFont><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>
    </a:fontScheme>
    <a:fmtScheme name="{name}">
      <a:fillStyleLst>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
      </a:fillStyleLst>
      <a:lnStyleLst>
        <a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
        <a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
        <a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
      </a:lnStyleLst>
      <a:effectStyleLst>
        <a:effectStyle><a:effectLst/></a:effectStyle>
        <a:effectStyle><a:effectLst/></a:effectStyle>
        <a:effectStyle><a:effectLst/></a:effectStyle>
      </a:effectStyleLst>
      <a:bgFillStyleLst>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
      </a:bgFillStyleLst>
    </a:fmtScheme>
  </a:themeElements>
</a:theme>"#
    )
}

// --- Slides ---

fn slide_part<L: ImageLoader + ?Sized>(
    page: &DeckPage,
    media: &mut MediaLibrary<'_, L>,
) -> Result<(Vec<u8>, Relationships)> {
    let mut rels = Relationships::new();
    rels.add("slideLayout", "../slideLayouts/slideLayout1.xml");
    let mut embedded: HashMap<String, String> = HashMap::new();

    let mut xml = XmlPart::new()?;
    xml.start(
        "p:sld",
        &[
            ("xmlns:a", NS_DRAWING),
            ("xmlns:r", NS_OFFICE_REL),
            ("xmlns:p", NS_PRESENTATION),
        ],
    )?;
    xml.start("p:cSld", &[])?;

    xml.start("p:bg", &[])?;
    xml.start("p:bgPr", &[])?;
    solid_fill(&mut xml, &SolidFill::opaque(page.background))?;
    xml.empty("a:effectLst", &[])?;
    xml.end("p:bgPr")?;
    xml.end("p:bg")?;

    xml.start("p:spTree", &[])?;
    group_properties(&mut xml)?;

    // id 1 is the group itself.
    for (i, element) in page.page_elements.iter().enumerate() {
        let shape_id = i + 2;
        match &element.element_kind {
            PageElementKind::Shape(shape) => {
                write_shape(&mut xml, shape_id, element, shape)?;
            }
            PageElementKind::Image(image) => match media.get(&image.source) {
                Some(stored) => {
                    let rel_id = embedded
                        .entry(stored.file_name.clone())
                        .or_insert_with(|| {
                            rels.add(REL_IMAGE, format!("../media/{}", stored.file_name))
                        })
                        .clone();
                    let frame = match stored.aspect_ratio {
                        Some(ratio) => element.frame.contain(ratio),
                        None => element.frame,
                    };
                    write_picture(&mut xml, shape_id, element, image, frame, &rel_id)?;
                }
                None => {
                    warn!("Drawing a placeholder for {} on {}", image.source, page.object_id);
                    let placeholder = placeholder_shape(image);
                    write_shape(&mut xml, shape_id, element, &placeholder)?;
                }
            },
        }
    }

    xml.end("p:spTree")?;
    xml.end("p:cSld")?;
    xml.start("p:clrMapOvr", &[])?;
    xml.empty("a:masterClrMapping", &[])?;
    xml.end("p:clrMapOvr")?;
    xml.end("p:sld")?;
    Ok((xml.finish(), rels))
}

fn placeholder_shape(image: &Image) -> Shape {
    let label = format!("Image: {}", image.source.file_name());
    let mut shape = Shape::filled(ShapeType::Rectangle, SolidFill::opaque(PLACEHOLDER_FILL))
        .with_outline(Outline {
            color: PLACEHOLDER_LINE,
            weight_pt: 1.0,
        });
    shape.text = Some(
        TextContent::single(
            label,
            TextStyle::sized(14.0).italic().color(PLACEHOLDER_TEXT),
            Alignment::Center,
        )
        .anchored(VerticalAlign::Middle),
    );
    shape
}

fn transform(xml: &mut XmlPart, frame: &Frame) -> Result<()> {
    let x = inches_to_emu(frame.x).to_string();
    let y = inches_to_emu(frame.y).to_string();
    let cx = inches_to_emu(frame.w.max(0.0)).to_string();
    let cy = inches_to_emu(frame.h.max(0.0)).to_string();
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
    xml.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    xml.end("a:xfrm")
}

fn preset_geometry(xml: &mut XmlPart, preset: &str) -> Result<()> {
    xml.start("a:prstGeom", &[("prst", preset)])?;
    xml.empty("a:avLst", &[])?;
    xml.end("a:prstGeom")
}

fn solid_fill(xml: &mut XmlPart, fill: &SolidFill) -> Result<()> {
    let hex = fill.color.to_hex();
    xml.start("a:solidFill", &[])?;
    if fill.alpha < 1.0 {
        // DrawingML alpha is in thousandths of a percent.
        let alpha = ((fill.alpha.clamp(0.0, 1.0) * 100_000.0).round() as i64).to_string();
        xml.start("a:srgbClr", &[("val", hex.as_str())])?;
        xml.empty("a:alpha", &[("val", alpha.as_str())])?;
        xml.end("a:srgbClr")?;
    } else {
        xml.empty("a:srgbClr", &[("val", hex.as_str())])?;
    }
    xml.end("a:solidFill")
}

fn write_shape(xml: &mut XmlPart, id: usize, element: &PageElement, shape: &Shape) -> Result<()> {
    let id = id.to_string();
    let is_text_box = shape.shape_type == ShapeType::TextBox;

    xml.start("p:sp", &[])?;
    xml.start("p:nvSpPr", &[])?;
    xml.empty(
        "p:cNvPr",
        &[("id", id.as_str()), ("name", element.object_id.as_str())],
    )?;
    if is_text_box {
        xml.empty("p:cNvSpPr", &[("txBox", "1")])?;
    } else {
        xml.empty("p:cNvSpPr", &[])?;
    }
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvSpPr")?;

    xml.start("p:spPr", &[])?;
    transform(xml, &element.frame)?;
    preset_geometry(xml, shape.shape_type.preset_geometry())?;
    match &shape.fill {
        Some(fill) => solid_fill(xml, fill)?,
        None => xml.empty("a:noFill", &[])?,
    }
    match &shape.outline {
        Some(outline) => {
            let width = ((outline.weight_pt * EMU_PER_INCH / PT_PER_INCH).round() as i64).to_string();
            xml.start("a:ln", &[("w", width.as_str())])?;
            solid_fill(xml, &SolidFill::opaque(outline.color))?;
            xml.end("a:ln")?;
        }
        None => {
            xml.start("a:ln", &[])?;
            xml.empty("a:noFill", &[])?;
            xml.end("a:ln")?;
        }
    }
    xml.end("p:spPr")?;

    if let Some(text) = &shape.text {
        write_text_body(xml, text)?;
    }
    xml.end("p:sp")
}

fn write_text_body(xml: &mut XmlPart, text: &TextContent) -> Result<()> {
    let anchor = match text.vertical_align {
        VerticalAlign::Top => "t",
        VerticalAlign::Middle => "ctr",
        VerticalAlign::Bottom => "b",
    };
    xml.start("p:txBody", &[])?;
    xml.start("a:bodyPr", &[("wrap", "square"), ("rtlCol", "0"), ("anchor", anchor)])?;
    xml.empty("a:normAutofit", &[])?;
    xml.end("a:bodyPr")?;
    xml.empty("a:lstStyle", &[])?;

    if text.paragraphs.is_empty() {
        xml.start("a:p", &[])?;
        xml.empty("a:endParaRPr", &[("lang", "en-GB")])?;
        xml.end("a:p")?;
    }
    for paragraph in &text.paragraphs {
        let align = match paragraph.alignment {
            Alignment::Start => "l",
            Alignment::Center => "ctr",
            Alignment::End => "r",
        };
        xml.start("a:p", &[])?;
        xml.empty("a:pPr", &[("algn", align)])?;
        for run in &paragraph.runs {
            xml.start("a:r", &[])?;
            run_properties(xml, &run.style)?;
            xml.leaf("a:t", &[], &run.content)?;
            xml.end("a:r")?;
        }
        xml.end("a:p")?;
    }
    xml.end("p:txBody")
}

fn run_properties(xml: &mut XmlPart, style: &TextStyle) -> Result<()> {
    // Hundredths of a point.
    let size = style
        .font_size_pt
        .map(|pt| ((pt * 100.0).round() as i64).to_string());
    let mut attrs: Vec<(&str, &str)> = vec![("lang", "en-GB"), ("dirty", "0")];
    if let Some(size) = &size {
        attrs.push(("sz", size.as_str()));
    }
    if style.bold {
        attrs.push(("b", "1"));
    }
    if style.italic {
        attrs.push(("i", "1"));
    }

    if style.color.is_none() && style.font_family.is_none() {
        return xml.empty("a:rPr", &attrs);
    }
    xml.start("a:rPr", &attrs)?;
    if let Some(color) = style.color {
        solid_fill(xml, &SolidFill::opaque(color))?;
    }
    if let Some(font) = &style.font_family {
        xml.empty("a:latin", &[("typeface", font.as_str())])?;
        xml.empty("a:ea", &[("typeface", font.as_str())])?;
        xml.empty("a:cs", &[("typeface", font.as_str())])?;
    }
    xml.end("a:rPr")
}

fn write_picture(
    xml: &mut XmlPart,
    id: usize,
    element: &PageElement,
    image: &Image,
    frame: Frame,
    rel_id: &str,
) -> Result<()> {
    let id = id.to_string();
    xml.start("p:pic", &[])?;
    xml.start("p:nvPicPr", &[])?;
    xml.empty(
        "p:cNvPr",
        &[
            ("id", id.as_str()),
            ("name", element.object_id.as_str()),
            ("descr", image.description.as_str()),
        ],
    )?;
    xml.start("p:cNvPicPr", &[])?;
    xml.empty("a:picLocks", &[("noChangeAspect", "1")])?;
    xml.end("p:cNvPicPr")?;
    xml.empty("p:nvPr", &[])?;
    xml.end("p:nvPicPr")?;

    xml.start("p:blipFill", &[])?;
    xml.empty("a:blip", &[("r:embed", rel_id)])?;
    xml.start("a:stretch", &[])?;
    xml.empty("a:fillRect", &[])?;
    xml.end("a:stretch")?;
    xml.end("p:blipFill")?;

    xml.start("p:spPr", &[])?;
    transform(xml, &frame)?;
    preset_geometry(xml, "rect")?;
    xml.end("p:spPr")?;
    xml.end("p:pic")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::ooxml::tests::{part_names, read_part};
    use crate::errors::RenderError;
    use crate::images::tests::png_bytes;
    use crate::images::LoadedImage;
    use crate::layout::render_slide;
    use crate::models::lesson::SlideSpec;
    use crate::models::presentation::PAGE_SIZE;
    use crate::themes::resolve_theme;

    /// Serves one PNG for every local path and fails everything else.
    struct FakeLoader;

    impl ImageLoader for FakeLoader {
        fn load(&self, source: &ImageRef) -> Result<LoadedImage> {
            match source {
                ImageRef::Local(_) => LoadedImage::from_bytes(png_bytes(40, 20)),
                other => Err(RenderError::Image(format!("not found: {other}"))),
            }
        }
    }

    fn deck(images: &[&str]) -> DeckPresentation {
        let slide = SlideSpec {
            title: "Rivers & Streams".into(),
            content: "- Source\n- Mouth".into(),
            notes: Some("Point at the map".into()),
            ..Default::default()
        };
        let refs: Vec<ImageRef> = images.iter().map(|s| ImageRef::parse(s)).collect();
        DeckPresentation {
            title: "Rivers".into(),
            subject: "Geography".into(),
            theme_name: "Geography".into(),
            page_size: PAGE_SIZE,
            slides: vec![render_slide(&slide, resolve_theme("geography"), &refs, 0, "Arial")],
        }
    }

    #[test]
    fn writes_required_parts() {
        let bytes = write_pptx(&deck(&[]), &FakeLoader, &RenderConfig::default()).unwrap();
        let names = part_names(&bytes);
        for required in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "docProps/app.xml",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slides/slide1.xml",
            "ppt/slides/_rels/slide1.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
        ] {
            assert!(names.iter().any(|n| n == required), "missing {required}");
        }
        let slide = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide.contains("Rivers &amp; Streams"));
        assert!(slide.contains("Teacher Note: Point at the map"));
        assert!(slide.contains("typeface=\"Arial\""));
    }

    #[test]
    fn same_image_is_stored_once() {
        let bytes = write_pptx(
            &deck(&["/tmp/a.png", "/tmp/a.png"]),
            &FakeLoader,
            &RenderConfig::default(),
        )
        .unwrap();
        let media: Vec<String> = part_names(&bytes)
            .into_iter()
            .filter(|n| n.starts_with("ppt/media/"))
            .collect();
        assert_eq!(media, vec!["ppt/media/image1.png"]);
        let slide = read_part(&bytes, "ppt/slides/slide1.xml");
        assert_eq!(slide.matches("<p:pic>").count(), 2);
        assert!(read_part(&bytes, "[Content_Types].xml").contains("Extension=\"png\""));
    }

    #[test]
    fn unloadable_image_becomes_placeholder() {
        let bytes = write_pptx(
            &deck(&["https://img.example/missing.jpg"]),
            &FakeLoader,
            &RenderConfig::default(),
        )
        .unwrap();
        let slide = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(!slide.contains("<p:pic>"));
        assert!(slide.contains("Image: missing.jpg"));
    }

    #[test]
    fn slide_size_is_four_by_three() {
        let bytes = write_pptx(&deck(&[]), &FakeLoader, &RenderConfig::default()).unwrap();
        let presentation = read_part(&bytes, "ppt/presentation.xml");
        assert!(presentation.contains("cx=\"9144000\" cy=\"6858000\""));
    }
}
