//! href and path helpers
use crate::document::Document;

/// `data[member].href`, when it is a string
pub fn get_href<'d>(data: &'d Document, member: &str) -> Option<&'d str> {
    data.get(member)?.get("href")?.as_str()
}

/// Last `/`-separated segment of `path`, ignoring trailing `/` and spaces
pub fn last_segment(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', ' ']);
    trimmed.rsplit('/').next().unwrap_or_default()
}

/// Replace the first occurrence of each key in `path` with its value, in order
pub fn sub_path<I, K, V>(path: &str, substitutions: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    substitutions
        .into_iter()
        .fold(path.to_string(), |path, (from, to)| {
            path.replacen(from.as_ref(), to.as_ref(), 1)
        })
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn href() {
        let data = json!({"machineTemplate": {"href": "/templates/1"}, "name": "vm", "disk": {}});

        assert_eq!(get_href(&data, "machineTemplate"), Some("/templates/1"));
        assert_eq!(get_href(&data, "name"), None);
        assert_eq!(get_href(&data, "disk"), None);
        assert_eq!(get_href(&data, "missing"), None);
        assert_eq!(get_href(&json!(null), "machineTemplate"), None);
    }

    #[test]
    fn last_segments() {
        assert_eq!(last_segment("/cimiv1/machines/42"), "42");
        assert_eq!(last_segment("/cimiv1/machines/42/ "), "42");
        assert_eq!(last_segment("42"), "42");
        assert_eq!(last_segment("/"), "");
        assert_eq!(last_segment(""), "");
    }

    #[test]
    fn substitutions_apply_once_in_order() {
        assert_eq!(
            sub_path(
                "/cimiv1/machines/machines",
                [("cimiv1", "v2/tenant"), ("machines", "servers")]
            ),
            "/v2/tenant/servers/machines"
        );
        assert_eq!(sub_path("/a", Vec::<(&str, &str)>::new()), "/a");
    }
}
