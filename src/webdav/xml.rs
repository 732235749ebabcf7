use crate::webdav::properties::{DavProperty, NAMESPACE_DAV, NAMESPACE_NC, NAMESPACE_OC};

pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn namespace_attrs() -> String {
    format!(r#"xmlns:d="{NAMESPACE_DAV}" xmlns:oc="{NAMESPACE_OC}" xmlns:nc="{NAMESPACE_NC}""#)
}

/// `<d:propfind>` asking for exactly `properties`.
pub fn build_propfind_body(properties: &[DavProperty]) -> String {
    let mut body = String::from(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    body.push_str(&format!("<d:propfind {}><d:prop>", namespace_attrs()));
    for property in properties {
        body.push('<');
        body.push_str(&property.qualified_name());
        body.push_str("/>");
    }
    body.push_str("</d:prop></d:propfind>");
    body
}

/// `<d:propertyupdate>` setting each `(property, value)` pair and removing `remove`.
pub fn build_proppatch_body(set: &[(DavProperty, &str)], remove: &[DavProperty]) -> String {
    let mut body = String::from(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    body.push_str(&format!("<d:propertyupdate {}>", namespace_attrs()));

    if !set.is_empty() {
        body.push_str("<d:set><d:prop>");
        for (property, value) in set {
            let name = property.qualified_name();
            body.push_str(&format!("<{name}>{}</{name}>", escape_xml(value)));
        }
        body.push_str("</d:prop></d:set>");
    }

    if !remove.is_empty() {
        body.push_str("<d:remove><d:prop>");
        for property in remove {
            body.push('<');
            body.push_str(&property.qualified_name());
            body.push_str("/>");
        }
        body.push_str("</d:prop></d:remove>");
    }

    body.push_str("</d:propertyupdate>");
    body
}
