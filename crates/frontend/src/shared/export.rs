//! Spreadsheet export.
//!
//! Sheets are serialized as a single-worksheet SpreadsheetML workbook
//! (the XML dialect Excel has opened since 2003), which is the simplest
//! format that can still carry the right-to-left orientation Arabic
//! sheets need. The serialized workbook is handed to the browser as a
//! Blob download.

use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// A sheet under construction: plain rows of pre-formatted cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub right_to_left: bool,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: &str, right_to_left: bool) -> Self {
        Self {
            name: name.to_string(),
            right_to_left,
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn blank_row(&mut self) {
        self.rows.push(Vec::new());
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Serialize to a SpreadsheetML workbook.
    pub fn to_workbook_xml(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<?mso-application progid=\"Excel.Sheet\"?>\n");
        out.push_str(
            "<Workbook xmlns=\"urn:schemas-microsoft-com:office:spreadsheet\" \
             xmlns:ss=\"urn:schemas-microsoft-com:office:spreadsheet\">\n",
        );
        out.push_str(&format!(
            " <Worksheet ss:Name=\"{}\">\n  <Table>\n",
            escape_xml(&self.name)
        ));
        for row in &self.rows {
            out.push_str("   <Row>");
            for cell in row {
                out.push_str(&format!(
                    "<Cell><Data ss:Type=\"String\">{}</Data></Cell>",
                    escape_xml(cell)
                ));
            }
            out.push_str("</Row>\n");
        }
        out.push_str("  </Table>\n");
        out.push_str("  <WorksheetOptions xmlns=\"urn:schemas-microsoft-com:office:excel\">\n");
        if self.right_to_left {
            out.push_str("   <DisplayRightToLeft/>\n");
        }
        out.push_str("  </WorksheetOptions>\n </Worksheet>\n</Workbook>\n");
        out
    }
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Serialize the sheet and trigger a browser download.
pub fn download_sheet(sheet: &Sheet, filename: &str) -> Result<(), String> {
    let blob = create_workbook_blob(&sheet.to_workbook_xml())?;
    download_blob(&blob, filename)
}

fn create_workbook_blob(content: &str) -> Result<Blob, String> {
    let array = js_sys::Array::new();
    array.push(&wasm_bindgen::JsValue::from_str(content));

    let properties = BlobPropertyBag::new();
    properties.set_type("application/vnd.ms-excel;charset=utf-8;");

    Blob::new_with_str_sequence_and_options(&array, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))
}

fn download_blob(blob: &Blob, filename: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;

    let url = Url::create_object_url_with_blob(blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;

    // Temporary hidden anchor: append, click, remove
    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| format!("Failed to set style: {:?}", e))?;

    document
        .body()
        .ok_or("No body element")?
        .append_child(&anchor)
        .map_err(|e| format!("Failed to append anchor: {:?}", e))?;

    anchor.click();

    document
        .body()
        .ok_or("No body element")?
        .remove_child(&anchor)
        .map_err(|e| format!("Failed to remove anchor: {:?}", e))?;

    Url::revoke_object_url(&url).map_err(|e| format!("Failed to revoke URL: {:?}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workbook_contains_rows_and_escaped_cells() {
        let mut sheet = Sheet::new("Quote", false);
        sheet.push_row(["a", "b & c"]);
        sheet.blank_row();
        sheet.push_row(["<tag>"]);

        let xml = sheet.to_workbook_xml();
        assert!(xml.contains("ss:Name=\"Quote\""));
        assert!(xml.contains("<Data ss:Type=\"String\">a</Data>"));
        assert!(xml.contains("b &amp; c"));
        assert!(xml.contains("&lt;tag&gt;"));
        assert!(!xml.contains("<DisplayRightToLeft/>"));
        assert_eq!(xml.matches("<Row>").count(), 3);
    }

    #[test]
    fn arabic_sheets_are_right_to_left() {
        let sheet = Sheet::new("عرض السعر", true);
        let xml = sheet.to_workbook_xml();
        assert!(xml.contains("<DisplayRightToLeft/>"));
        assert!(xml.contains("ss:Name=\"عرض السعر\""));
    }
}
