//! Shared plumbing for the OOXML zip packages: an XML part builder, the package
//! writer, relationship and content-type tables, and document metadata.

use chrono::Utc;
use log::{debug, warn};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::io::{Cursor, Write};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::errors::{RenderError, Result};
use crate::images::{EmbedFormat, ImageLoader, LoadedImage};
use crate::models::image::ImageRef;

// --- Namespaces and relationship types ---

pub(crate) const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
pub(crate) const NS_CONTENT_TYPES: &str =
    "http://schemas.openxmlformats.org/package/2006/content-types";
pub(crate) const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_PICTURE: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
pub(crate) const NS_OFFICE_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const REL_IMAGE: &str = "image";
pub(crate) const REL_OFFICE_DOCUMENT: &str = "officeDocument";
pub(crate) const REL_EXTENDED_PROPERTIES: &str = "extended-properties";
pub(crate) const REL_THEME: &str = "theme";
const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

pub(crate) const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
pub(crate) const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
pub(crate) const CT_EXTENDED: &str =
    "application/vnd.openxmlformats-officedocument.extended-properties+xml";

fn xml_error(e: impl Display) -> RenderError {
    RenderError::Package(e.to_string())
}

// --- XML parts ---

/// True for characters XML 1.0 does not allow in any form: C0 controls other
/// than tab, LF and CR, and the non-characters U+FFFE and U+FFFF.
fn is_xml_illegal(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}

/// Replaces characters XML 1.0 cannot carry with a space. Borrows when the
/// text is already clean.
pub(crate) fn xml_safe(text: &str) -> Cow<'_, str> {
    if text.chars().any(is_xml_illegal) {
        Cow::Owned(
            text.chars()
                .map(|c| if is_xml_illegal(c) { ' ' } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(text)
    }
}

/// Builds one XML part with a quick-xml event writer.
/// Text and attribute values are escaped by the writer after [`xml_safe`]
/// has removed characters XML cannot hold.
pub(crate) struct XmlPart {
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    /// Starts a part with the standalone UTF-8 declaration.
    pub(crate) fn new() -> Result<Self> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_error)?;
        Ok(Self { writer })
    }

    fn element<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
        let mut start = BytesStart::new(name);
        for &(key, value) in attrs {
            start.push_attribute((key, xml_safe(value).as_ref()));
        }
        start
    }

    pub(crate) fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.writer
            .write_event(Event::Start(Self::element(name, attrs)))
            .map_err(xml_error)
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<()> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_error)
    }

    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.writer
            .write_event(Event::Empty(Self::element(name, attrs)))
            .map_err(xml_error)
    }

    pub(crate) fn text(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_event(Event::Text(BytesText::new(&xml_safe(text))))
            .map_err(xml_error)
    }

    /// `<name attrs>text</name>`
    pub(crate) fn leaf(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

// --- Relationships ---

struct Relationship {
    id: String,
    rel_type: String,
    target: String,
}

/// The relationship table of one part. IDs are assigned in insertion order.
#[derive(Default)]
pub(crate) struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds an office-document relationship (`kind` is the last path segment of
    /// the type URI, e.g. `"image"`) and returns its ID.
    pub(crate) fn add(&mut self, kind: &str, target: impl Into<String>) -> String {
        self.add_typed(format!("{REL_BASE}/{kind}"), target)
    }

    fn add_typed(&mut self, rel_type: String, target: impl Into<String>) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push(Relationship {
            id: id.clone(),
            rel_type,
            target: target.into(),
        });
        id
    }

    pub(crate) fn to_xml(&self) -> Result<Vec<u8>> {
        let mut xml = XmlPart::new()?;
        xml.start("Relationships", &[("xmlns", NS_RELATIONSHIPS)])?;
        for rel in &self.entries {
            xml.empty(
                "Relationship",
                &[
                    ("Id", rel.id.as_str()),
                    ("Type", rel.rel_type.as_str()),
                    ("Target", rel.target.as_str()),
                ],
            )?;
        }
        xml.end("Relationships")?;
        Ok(xml.finish())
    }
}

/// The package-level `_rels/.rels`: main part plus both property parts.
pub(crate) fn package_relationships(main_part: &str) -> Result<Vec<u8>> {
    let mut rels = Relationships::new();
    rels.add(REL_OFFICE_DOCUMENT, main_part);
    rels.add_typed(REL_CORE_PROPERTIES.to_string(), "docProps/core.xml");
    rels.add(REL_EXTENDED_PROPERTIES, "docProps/app.xml");
    rels.to_xml()
}

// --- Content types ---

/// `[Content_Types].xml`: extension defaults plus per-part overrides.
pub(crate) struct ContentTypes {
    defaults: BTreeMap<String, String>,
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    pub(crate) fn new() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert("rels".to_string(), CT_RELATIONSHIPS.to_string());
        defaults.insert("xml".to_string(), "application/xml".to_string());
        Self {
            defaults,
            overrides: vec![
                ("/docProps/core.xml".to_string(), CT_CORE.to_string()),
                ("/docProps/app.xml".to_string(), CT_EXTENDED.to_string()),
            ],
        }
    }

    pub(crate) fn add_override(&mut self, part: impl Into<String>, content_type: &str) {
        self.overrides.push((part.into(), content_type.to_string()));
    }

    /// Registers the extension of an embedded image format.
    pub(crate) fn add_image(&mut self, format: EmbedFormat) {
        self.defaults
            .entry(format.extension().to_string())
            .or_insert_with(|| format.content_type().to_string());
    }

    pub(crate) fn to_xml(&self) -> Result<Vec<u8>> {
        let mut xml = XmlPart::new()?;
        xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
        for (ext, ct) in &self.defaults {
            xml.empty(
                "Default",
                &[("Extension", ext.as_str()), ("ContentType", ct.as_str())],
            )?;
        }
        for (part, ct) in &self.overrides {
            xml.empty(
                "Override",
                &[("PartName", part.as_str()), ("ContentType", ct.as_str())],
            )?;
        }
        xml.end("Types")?;
        Ok(xml.finish())
    }
}

// --- Metadata ---

/// `docProps/core.xml` with the current UTC time as created and modified.
pub(crate) fn core_properties(title: &str, author: &str) -> Result<Vec<u8>> {
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let w3cdtf = [("xsi:type", "dcterms:W3CDTF")];

    let mut xml = XmlPart::new()?;
    xml.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    xml.leaf("dc:title", &[], title)?;
    xml.leaf("dc:creator", &[], author)?;
    xml.leaf("cp:lastModifiedBy", &[], author)?;
    xml.leaf("cp:revision", &[], "1")?;
    xml.leaf("dcterms:created", &w3cdtf, &now)?;
    xml.leaf("dcterms:modified", &w3cdtf, &now)?;
    xml.end("cp:coreProperties")?;
    Ok(xml.finish())
}

/// `docProps/app.xml`. `counts` are extra elements such as `("Slides", 7)`.
pub(crate) fn app_properties(application: &str, counts: &[(&str, usize)]) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start(
        "Properties",
        &[
            (
                "xmlns",
                "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
            ),
            (
                "xmlns:vt",
                "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes",
            ),
        ],
    )?;
    xml.leaf("Application", &[], application)?;
    for (name, count) in counts {
        xml.leaf(name, &[], &count.to_string())?;
    }
    xml.end("Properties")?;
    Ok(xml.finish())
}

// --- Media ---

/// An image stored once in the package's media directory.
#[derive(Debug, Clone)]
pub(crate) struct StoredMedia {
    /// File name inside the media directory, e.g. `image1.png`.
    pub(crate) file_name: String,
    pub(crate) aspect_ratio: Option<f64>,
}

/// Loads each distinct image reference once and remembers failures, so a
/// missing file is only reported the first time it is used.
pub(crate) struct MediaLibrary<'a, L: ImageLoader + ?Sized> {
    loader: &'a L,
    media_dir: &'static str,
    entries: HashMap<ImageRef, Option<StoredMedia>>,
    files: Vec<(String, LoadedImage)>,
}

impl<'a, L: ImageLoader + ?Sized> MediaLibrary<'a, L> {
    /// `media_dir` is the package folder the files land in, e.g. `ppt/media`.
    pub(crate) fn new(loader: &'a L, media_dir: &'static str) -> Self {
        Self {
            loader,
            media_dir,
            entries: HashMap::new(),
            files: Vec::new(),
        }
    }

    /// The stored media for `source`, or `None` when it could not be loaded.
    pub(crate) fn get(&mut self, source: &ImageRef) -> Option<StoredMedia> {
        if let Some(entry) = self.entries.get(source) {
            return entry.clone();
        }
        let entry = match self.loader.load(source) {
            Ok(image) => {
                let file_name =
                    format!("image{}.{}", self.files.len() + 1, image.format.extension());
                debug!("Embedding {} as {}", source, file_name);
                let stored = StoredMedia {
                    file_name: file_name.clone(),
                    aspect_ratio: image.aspect_ratio(),
                };
                self.files.push((file_name, image));
                Some(stored)
            }
            Err(e) => {
                warn!("Image {} could not be loaded: {}", source, e);
                None
            }
        };
        self.entries.insert(source.clone(), entry.clone());
        entry
    }

    pub(crate) fn len(&self) -> usize {
        self.files.len()
    }

    /// Adds every stored file to the package and registers its extension.
    pub(crate) fn write_into(
        &self,
        package: &mut Package,
        content_types: &mut ContentTypes,
    ) -> Result<()> {
        for (file_name, image) in &self.files {
            content_types.add_image(image.format);
            package.add_stored(&format!("{}/{}", self.media_dir, file_name), &image.bytes)?;
        }
        Ok(())
    }
}

// --- Package ---

/// An in-memory zip package. Nothing touches the filesystem until the caller
/// writes the finished bytes.
pub(crate) struct Package {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    parts: usize,
}

impl Package {
    pub(crate) fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            parts: 0,
        }
    }

    /// Adds a deflated part.
    pub(crate) fn add(&mut self, path: &str, bytes: &[u8]) -> Result<()> {
        self.add_with(path, bytes, CompressionMethod::Deflated)
    }

    /// Adds an already-compressed part (images) without recompressing it.
    pub(crate) fn add_stored(&mut self, path: &str, bytes: &[u8]) -> Result<()> {
        self.add_with(path, bytes, CompressionMethod::Stored)
    }

    fn add_with(&mut self, path: &str, bytes: &[u8], method: CompressionMethod) -> Result<()> {
        let options = FileOptions::<'_, ()>::default().compression_method(method);
        self.zip.start_file(path, options)?;
        self.zip.write_all(bytes)?;
        self.parts += 1;
        Ok(())
    }

    pub(crate) fn finish(self) -> Result<Vec<u8>> {
        debug!("Finishing package with {} parts", self.parts);
        Ok(self.zip.finish()?.into_inner())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Read;

    /// Reads one part of a finished package as a string.
    pub(crate) fn read_part(bytes: &[u8], path: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(path).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    pub(crate) fn part_names(bytes: &[u8]) -> Vec<String> {
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn xml_text_and_attributes_are_escaped() {
        let mut xml = XmlPart::new().unwrap();
        xml.leaf("t", &[("name", "a\"b")], "Fish & <Chips>").unwrap();
        let out = String::from_utf8(xml.finish()).unwrap();
        assert!(out.contains("Fish &amp; &lt;Chips&gt;"));
        assert!(out.contains("name=\"a&quot;b\""));
    }

    #[test]
    fn control_characters_become_spaces() {
        assert_eq!(xml_safe("plain\ttext\n"), "plain\ttext\n");
        assert!(matches!(xml_safe("plain"), Cow::Borrowed(_)));
        assert_eq!(xml_safe("Sound\u{B}waves\u{1}"), "Sound waves ");

        let mut xml = XmlPart::new().unwrap();
        xml.leaf("t", &[("descr", "a\u{0}b")], "c\u{1F}d\u{FFFF}").unwrap();
        let out = String::from_utf8(xml.finish()).unwrap();
        assert!(out.contains("descr=\"a b\""));
        assert!(out.contains(">c d </t>"));
        assert!(!out.chars().any(is_xml_illegal));
    }

    #[test]
    fn relationships_get_sequential_ids() {
        let mut rels = Relationships::new();
        assert_eq!(rels.add(REL_IMAGE, "media/image1.png"), "rId1");
        assert_eq!(rels.add(REL_THEME, "theme/theme1.xml"), "rId2");
        let xml = String::from_utf8(rels.to_xml().unwrap()).unwrap();
        assert!(xml.contains("relationships/image\" Target=\"media/image1.png\""));
    }

    #[test]
    fn image_extensions_are_registered_once() {
        let mut types = ContentTypes::new();
        types.add_image(EmbedFormat::Png);
        types.add_image(EmbedFormat::Png);
        let xml = String::from_utf8(types.to_xml().unwrap()).unwrap();
        assert_eq!(xml.matches("Extension=\"png\"").count(), 1);
    }

    #[test]
    fn package_round_trips_parts() {
        let mut package = Package::new();
        package.add("a.xml", b"<a/>").unwrap();
        package.add_stored("media/b.bin", &[1, 2, 3]).unwrap();
        let bytes = package.finish().unwrap();
        assert_eq!(read_part(&bytes, "a.xml"), "<a/>");
        assert_eq!(part_names(&bytes).len(), 2);
    }

    #[test]
    fn core_properties_carry_title_and_author() {
        let xml = String::from_utf8(core_properties("Rivers & Seas", "LessonLaunch").unwrap())
            .unwrap();
        assert!(xml.contains("<dc:title>Rivers &amp; Seas</dc:title>"));
        assert!(xml.contains("<dc:creator>LessonLaunch</dc:creator>"));
    }

    #[test]
    fn media_is_loaded_once_per_reference() {
        use crate::images::tests::png_bytes;
        use std::cell::Cell;

        struct CountingLoader(Cell<usize>);
        impl ImageLoader for CountingLoader {
            fn load(&self, source: &ImageRef) -> Result<LoadedImage> {
                self.0.set(self.0.get() + 1);
                match source {
                    ImageRef::Local(_) => LoadedImage::from_bytes(png_bytes(30, 10)),
                    _ => Err(RenderError::Image("offline".into())),
                }
            }
        }

        let loader = CountingLoader(Cell::new(0));
        let mut media = MediaLibrary::new(&loader, "word/media");
        let local = ImageRef::parse("/tmp/a.png");
        let remote = ImageRef::parse("https://img.example/b.png");

        let first = media.get(&local).unwrap();
        assert_eq!(first.file_name, "image1.png");
        assert_eq!(first.aspect_ratio, Some(3.0));
        assert!(media.get(&local).is_some());
        assert!(media.get(&remote).is_none());
        assert!(media.get(&remote).is_none());
        assert_eq!(loader.0.get(), 2);
        assert_eq!(media.len(), 1);

        let mut package = Package::new();
        let mut types = ContentTypes::new();
        media.write_into(&mut package, &mut types).unwrap();
        let bytes = package.finish().unwrap();
        assert_eq!(part_names(&bytes), vec!["word/media/image1.png"]);
    }
}
