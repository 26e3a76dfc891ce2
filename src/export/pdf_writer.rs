//! 固定页面尺寸的 PDF 文档
//!
//! 对外使用毫米、左上角为原点的坐标，与常见的前端导出库一致；
//! 内部转换为 PDF 的点（pt）和左下角原点。

use std::io::Cursor;
use std::path::Path;

use image::{ColorType, DynamicImage, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::error::AppResult;

const MM_PER_INCH: f32 = 25.4;
const POINTS_PER_INCH: f32 = 72.0;

/// 毫米转换为 PDF 点
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_INCH / MM_PER_INCH
}

/// 页面方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// 页面格式（毫米）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFormat {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PageFormat {
    pub const A4: PageFormat = PageFormat {
        width_mm: 210.0,
        height_mm: 297.0,
    };

    /// 按方向调整宽高
    pub fn oriented(self, orientation: Orientation) -> Self {
        let (short, long) = if self.width_mm <= self.height_mm {
            (self.width_mm, self.height_mm)
        } else {
            (self.height_mm, self.width_mm)
        };
        match orientation {
            Orientation::Portrait => PageFormat {
                width_mm: short,
                height_mm: long,
            },
            Orientation::Landscape => PageFormat {
                width_mm: long,
                height_mm: short,
            },
        }
    }
}

/// 可以直接嵌入 PDF 的 JPEG 图片
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    width: u32,
    height: u32,
    color_space: &'static str,
    jpeg: Vec<u8>,
}

impl EmbeddedImage {
    /// 从任意可解码的图片数据创建
    ///
    /// RGB 或灰度 JPEG 原样嵌入，其他格式先转码为 JPEG。
    pub fn from_bytes(bytes: &[u8]) -> AppResult<Self> {
        let format = image::guess_format(bytes)?;
        let decoded = image::load_from_memory_with_format(bytes, format)?;
        let (width, height) = (decoded.width(), decoded.height());

        match (format, decoded.color()) {
            (ImageFormat::Jpeg, ColorType::Rgb8) => Ok(Self {
                width,
                height,
                color_space: "DeviceRGB",
                jpeg: bytes.to_vec(),
            }),
            (ImageFormat::Jpeg, ColorType::L8) => Ok(Self {
                width,
                height,
                color_space: "DeviceGray",
                jpeg: bytes.to_vec(),
            }),
            _ => {
                let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());
                let mut jpeg = Vec::new();
                rgb.write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)?;
                Ok(Self {
                    width,
                    height,
                    color_space: "DeviceRGB",
                    jpeg,
                })
            }
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

struct PendingPage {
    operations: Vec<Operation>,
    xobjects: Vec<(String, ObjectId)>,
}

impl PendingPage {
    fn new() -> Self {
        Self {
            operations: Vec::new(),
            xobjects: Vec::new(),
        }
    }
}

/// 固定尺寸页面的 PDF 文档
pub struct PdfDocument {
    doc: Document,
    pages_id: ObjectId,
    format: PageFormat,
    finished: Vec<PendingPage>,
    current: PendingPage,
    image_count: usize,
}

impl PdfDocument {
    /// 创建文档，自带一页空白初始页
    pub fn new(orientation: Orientation, format: PageFormat) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            format: format.oriented(orientation),
            finished: Vec::new(),
            current: PendingPage::new(),
            image_count: 0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.finished.len() + 1
    }

    /// 追加一页，之后的图片都画在新页上
    pub fn add_page(&mut self) {
        let page = std::mem::replace(&mut self.current, PendingPage::new());
        self.finished.push(page);
    }

    /// 在当前页放置图片
    ///
    /// `x`、`y`、`w`、`h` 以毫米为单位，原点在页面左上角。图片被拉伸填满该区域。
    pub fn add_image(&mut self, image: &EmbeddedImage, x: f32, y: f32, w: f32, h: f32) {
        self.image_count += 1;
        let name = format!("Im{}", self.image_count);

        let image_stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => image.color_space,
                "BitsPerComponent" => 8i64,
                "Filter" => "DCTDecode",
            },
            image.jpeg.clone(),
        )
        .with_compression(false);
        let image_id = self.doc.add_object(image_stream);

        let page_height_pt = mm_to_pt(self.format.height_mm);
        let width_pt = mm_to_pt(w);
        let height_pt = mm_to_pt(h);
        let x_pt = mm_to_pt(x);
        let y_pt = page_height_pt - mm_to_pt(y) - height_pt;

        let page = &mut self.current;
        page.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width_pt.into(),
                    0.0f32.into(),
                    0.0f32.into(),
                    height_pt.into(),
                    x_pt.into(),
                    y_pt.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.clone().into_bytes())]),
            Operation::new("Q", vec![]),
        ]);
        page.xobjects.push((name, image_id));
    }

    /// 组装页面树并写入文件
    pub fn save(mut self, path: &Path) -> AppResult<()> {
        let media_box: Vec<Object> = vec![
            0.0f32.into(),
            0.0f32.into(),
            mm_to_pt(self.format.width_mm).into(),
            mm_to_pt(self.format.height_mm).into(),
        ];

        let mut pages = std::mem::take(&mut self.finished);
        pages.push(std::mem::replace(&mut self.current, PendingPage::new()));

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for page in pages {
            let content = Content {
                operations: page.operations,
            };
            let content_id = self
                .doc
                .add_object(Stream::new(dictionary! {}, content.encode()?));

            let mut xobjects = lopdf::Dictionary::new();
            for (name, id) in page.xobjects {
                xobjects.set(name.into_bytes(), Object::Reference(id));
            }
            let resources_id = self.doc.add_object(dictionary! {
                "XObject" => xobjects,
            });

            let page_id = self.doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => self.pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => media_box.clone(),
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        self.doc.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    #[test]
    fn test_mm_to_pt() {
        assert!((mm_to_pt(25.4) - 72.0).abs() < 1e-4);
        assert!((mm_to_pt(210.0) - 595.2756).abs() < 1e-2);
    }

    #[test]
    fn test_orientation_swaps_dimensions() {
        let landscape = PageFormat::A4.oriented(Orientation::Landscape);
        assert_eq!(landscape.width_mm, 297.0);
        assert_eq!(landscape.height_mm, 210.0);
        assert_eq!(PageFormat::A4.oriented(Orientation::Portrait), PageFormat::A4);
    }

    #[test]
    fn test_embedded_image_keeps_jpeg_bytes() {
        let jpeg = encode(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(6, 8, Rgb([250, 250, 250]))),
            ImageFormat::Jpeg,
        );
        let embedded = EmbeddedImage::from_bytes(&jpeg).unwrap();
        assert_eq!(embedded.dimensions(), (6, 8));
        assert_eq!(embedded.color_space, "DeviceRGB");
        assert_eq!(embedded.jpeg, jpeg);
    }

    #[test]
    fn test_embedded_image_grayscale_jpeg() {
        let jpeg = encode(
            DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([255]))),
            ImageFormat::Jpeg,
        );
        let embedded = EmbeddedImage::from_bytes(&jpeg).unwrap();
        assert_eq!(embedded.color_space, "DeviceGray");
    }

    #[test]
    fn test_embedded_image_transcodes_png() {
        let png = encode(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(5, 3, Rgb([0, 0, 0]))),
            ImageFormat::Png,
        );
        let embedded = EmbeddedImage::from_bytes(&png).unwrap();
        assert_eq!(embedded.dimensions(), (5, 3));
        assert_eq!(image::guess_format(&embedded.jpeg).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_embedded_image_rejects_garbage() {
        assert!(EmbeddedImage::from_bytes(b"not an image").is_err());
    }

    #[test]
    fn test_save_writes_every_page() {
        let jpeg = encode(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]))),
            ImageFormat::Jpeg,
        );
        let image = EmbeddedImage::from_bytes(&jpeg).unwrap();

        let mut pdf = PdfDocument::new(Orientation::Portrait, PageFormat::A4);
        pdf.add_image(&image, 10.0, 10.0, 190.0, 277.0);
        pdf.add_page();
        pdf.add_image(&image, 10.0, 10.0, 190.0, 277.0);
        assert_eq!(pdf.page_count(), 2);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.pdf");
        pdf.save(&path).unwrap();

        let loaded = Document::load(&path).unwrap();
        assert_eq!(loaded.get_pages().len(), 2);
    }
}
