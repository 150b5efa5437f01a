//! `GDAL_METADATA` XML.

pub(crate) const GDAL_METADATA: u16 = 42112;
pub(crate) const GDAL_NODATA: u16 = 42113;

/// Serializes items as `<GDALMetadata><Item name="K">V</Item>...`.
pub fn to_xml(items: &[(String, String)]) -> String {
    let mut xml = String::from("<GDALMetadata>\n");
    for (name, value) in items {
        xml.push_str(&format!(
            "  <Item name=\"{}\">{}</Item>\n",
            escape(name),
            escape(value)
        ));
    }
    xml.push_str("</GDALMetadata>");
    xml
}

/// Parses the items of a `GDAL_METADATA` document.
///
/// Only `<Item name="...">` elements are recognised; other attributes such
/// as `domain` or `sample` are ignored.
pub fn from_xml(xml: &str) -> Vec<(String, String)> {
    let mut items = Vec::new();
    let mut rest = xml;

    while let Some(start) = rest.find("<Item") {
        rest = &rest[start + "<Item".len()..];
        let Some(tag_end) = rest.find('>') else { break };
        let attributes = &rest[..tag_end];
        rest = &rest[tag_end + 1..];

        let Some(value_end) = rest.find("</Item>") else { break };
        let value = &rest[..value_end];
        rest = &rest[value_end + "</Item>".len()..];

        if let Some(name) = attribute(attributes, "name") {
            items.push((unescape(name), unescape(value)));
        }
    }
    items
}

fn attribute<'a>(attributes: &'a str, key: &str) -> Option<&'a str> {
    let needle = format!("{}=\"", key);
    let start = attributes.find(&needle)? + needle.len();
    let len = attributes[start..].find('"')?;
    Some(&attributes[start..start + len])
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn unescape(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_to_xml() {
        let xml = to_xml(&items(&[("SOURCE", "DLR")]));
        assert_eq!(
            xml,
            "<GDALMetadata>\n  <Item name=\"SOURCE\">DLR</Item>\n</GDALMetadata>"
        );
    }

    #[test]
    fn test_special_characters_survive() {
        let original = items(&[("DESCRIPTION", "A & B <\"quoted\">")]);
        let xml = to_xml(&original);
        assert!(xml.contains("A &amp; B &lt;&quot;quoted&quot;&gt;"));
        assert_eq!(from_xml(&xml), original);
    }

    #[test]
    fn test_from_xml_ignores_extra_attributes() {
        let xml = r#"<GDALMetadata>
  <Item name="OVERVIEW_RESAMPLING" domain="IMAGE_STRUCTURE">AVERAGE</Item>
  <Item sample="0" name="SCALE">1</Item>
</GDALMetadata>"#;
        assert_eq!(
            from_xml(xml),
            items(&[("OVERVIEW_RESAMPLING", "AVERAGE"), ("SCALE", "1")])
        );
    }

    #[test]
    fn test_from_xml_malformed() {
        assert!(from_xml("<GDALMetadata><Item name=\"A\">unterminated").is_empty());
        assert!(from_xml("").is_empty());
    }
}
