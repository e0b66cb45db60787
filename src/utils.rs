use url::Url;

/// Page identifier: path plus query string, e.g. `/venta.html?pagina=2`
pub fn page_id(url: &Url) -> String {
    match url.query().filter(|q| !q.is_empty()) {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Convert a storage key into a safe filename
pub fn sanitize_filename(key: &str) -> String {
    let mut name = key.replace("http://", "").replace("https://", "");
    name = name.replace(['/', '\\', ':', '?', '&', '=', '#', '%', '*', '"', '<', '>', '|'], "_");

    // Limit filename length
    if name.len() > 100 {
        let mut end = 100;
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        name.truncate(end);
    }
    if name.is_empty() { "_".to_string() } else { name }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id() {
        let url = Url::parse("https://www.zonaprop.com.ar/departamentos-venta-pagina-2.html?orden=precio#top")
            .unwrap();
        assert_eq!(page_id(&url), "/departamentos-venta-pagina-2.html?orden=precio");

        let url = Url::parse("https://example.com/a/b").unwrap();
        assert_eq!(page_id(&url), "/a/b");

        let url = Url::parse("https://example.com/x?").unwrap();
        assert_eq!(page_id(&url), "/x");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("zonaprop_analyzer_data"), "zonaprop_analyzer_data");
        assert_eq!(sanitize_filename("https://a.com/x?y=1"), "a.com_x_y_1");
        assert_eq!(sanitize_filename(""), "_");
        assert_eq!(sanitize_filename(&"ñ".repeat(80)).len(), 100);
    }
}
