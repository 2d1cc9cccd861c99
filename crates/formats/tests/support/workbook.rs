use std::{fs::File, io::Write, path::Path};

use zip::{ZipWriter, write::SimpleFileOptions};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#;

/// A worksheet as raw `<sheetData>` inner XML.
pub struct Sheet<'a> {
    pub name: &'a str,
    pub rows_xml: &'a str,
}

pub fn write_workbook(path: &Path, sheets: &[Sheet<'_>], shared_strings: &[&str]) {
    let file = File::create(path).expect("workbook file should be created");
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    let mut put = |name: &str, content: &str| {
        zip.start_file(name, options)
            .expect("zip entry should start");
        zip.write_all(content.as_bytes())
            .expect("zip entry should be written");
    };

    put("[Content_Types].xml", CONTENT_TYPES);

    let mut relationships = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    let mut workbook = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    for (index, sheet) in sheets.iter().enumerate() {
        let number = index + 1;
        relationships.push_str(&format!(
            r#"<Relationship Id="rId{number}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{number}.xml"/>"#
        ));
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{number}" r:id="rId{number}"/>"#,
            sheet.name
        ));
    }
    relationships.push_str(
        r#"<Relationship Id="rIdStyles" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#,
    );
    workbook.push_str("</sheets></workbook>");

    put("xl/_rels/workbook.xml.rels", &relationships);
    put("xl/workbook.xml", &workbook);

    for (index, sheet) in sheets.iter().enumerate() {
        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
            sheet.rows_xml
        );
        put(&format!("xl/worksheets/sheet{}.xml", index + 1), &content);
    }

    if !shared_strings.is_empty() {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );
        for entry in shared_strings {
            content.push_str(&format!("<si><t>{entry}</t></si>"));
        }
        content.push_str("</sst>");
        put("xl/sharedStrings.xml", &content);
    }

    zip.finish().expect("workbook archive should finish");
}
