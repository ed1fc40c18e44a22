use super::ExtensionRequest;
use crate::error::VsixPrepError;
use std::path::Path;

/// Reads the extension list file: one `identifier[=version]` per line.
/// Blank lines and lines starting with `#` are ignored.
pub fn load_extension_list(path: &Path) -> Result<Vec<ExtensionRequest>, VsixPrepError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| VsixPrepError::ExtensionListLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    Ok(parse_extension_list(&content))
}

pub fn parse_extension_list(content: &str) -> Vec<ExtensionRequest> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ExtensionRequest::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_skips_blank_lines_and_comments() {
        let requests = parse_extension_list(
            "# pinned tooling\n\nms-python.python\n   \nfoo.bar=1.2.3\n",
        );
        assert_eq!(
            requests,
            vec![
                ExtensionRequest::new("ms-python.python", "latest"),
                ExtensionRequest::new("foo.bar", "1.2.3"),
            ]
        );
    }

    #[test]
    fn test_parse_list_keeps_input_order_and_duplicates() {
        let requests = parse_extension_list("foo.bar\nfoo.bar\n");
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], requests[1]);
    }

    #[test]
    fn test_load_missing_file_is_a_list_error() {
        let temp = tempfile::tempdir().expect("temp dir");
        let result = load_extension_list(&temp.path().join("absent.txt"));
        assert!(matches!(
            result,
            Err(VsixPrepError::ExtensionListLoad { .. })
        ));
    }

    #[test]
    fn test_load_reads_requests_from_disk() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("extensions.txt");
        std::fs::write(&path, "ms-python.python\n").expect("write list");

        let requests = load_extension_list(&path).expect("list loads");
        assert_eq!(
            requests,
            vec![ExtensionRequest::new("ms-python.python", "latest")]
        );
    }
}
