//! Small helpers shared by the views.

use std::collections::BTreeMap;

use iscore_http::QueryDict;

/// URL-encodes a map as a query string, keys in sorted order.
///
/// ```
/// use std::collections::BTreeMap;
/// use iscore_views::utils::query_string_from_dict;
///
/// let mut filter = BTreeMap::new();
/// filter.insert("title__contains".to_string(), "rust & co".to_string());
/// filter.insert("published".to_string(), "1".to_string());
/// assert_eq!(
///     query_string_from_dict(&filter),
///     "published=1&title__contains=rust%20%26%20co"
/// );
/// ```
pub fn query_string_from_dict(dict: &BTreeMap<String, String>) -> String {
    QueryDict::from_pairs(dict.iter().map(|(k, v)| (k.as_str(), v.as_str()))).urlencode()
}
