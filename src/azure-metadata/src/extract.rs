// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Interpretation of metadata responses.
//!
//! A missing tag or JSON path produces an empty string. Callers get their
//! default value only when the service itself is unavailable.

use serde_json::value::RawValue;
use std::collections::HashMap;

/// Returns the value of `tag` in a tag list formatted as `name:value;...`.
///
/// Each entry is split at its first `:`. Entries without a `:` are ignored.
/// If the tag appears more than once the last entry wins.
pub(crate) fn tag_value(tag: &str, tags: &str) -> String {
    tags.rsplit(';')
        .filter_map(|entry| entry.split_once(':'))
        .find(|(name, _)| *name == tag)
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}

/// Returns the value at a `/`-separated `path` in the JSON document `json`.
///
/// Array elements are addressed by index, and `#` returns the length of an
/// array. Strings are returned without quotes and `null` as an empty string.
/// Integers, booleans, objects and arrays are returned as they appear in the
/// document. Other numbers are returned in plain decimal notation.
pub(crate) fn json_value(json: &str, path: &str) -> String {
    let Ok(mut current) = serde_json::from_str::<&RawValue>(json) else {
        return String::new();
    };
    let mut segments = path.split('/').peekable();
    while let Some(segment) = segments.next() {
        let next = match current.get().trim_start().as_bytes().first() {
            Some(b'{') => serde_json::from_str::<HashMap<String, &RawValue>>(current.get())
                .ok()
                .and_then(|fields| fields.get(segment).copied()),
            Some(b'[') => {
                let Ok(items) = serde_json::from_str::<Vec<&RawValue>>(current.get()) else {
                    return String::new();
                };
                if segment == "#" && segments.peek().is_none() {
                    return items.len().to_string();
                }
                segment.parse::<usize>().ok().and_then(|i| items.get(i).copied())
            }
            _ => None,
        };
        match next {
            Some(v) => current = v,
            None => return String::new(),
        }
    }
    to_text(current.get().trim())
}

fn to_text(raw: &str) -> String {
    match raw.as_bytes().first() {
        Some(b'"') => serde_json::from_str::<String>(raw).unwrap_or_default(),
        Some(b'-' | b'0'..=b'9') => number_text(raw),
        _ if raw == "null" => String::new(),
        _ => raw.to_string(),
    }
}

fn number_text(raw: &str) -> String {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.bytes().all(|b| b.is_ascii_digit()) {
        return raw.to_string();
    }
    // `Display` for `f64` never uses an exponent and drops a trailing `.0`.
    raw.parse::<f64>()
        .map(|n| n.to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const LB: &str = r#"{"loadbalancer":{"publicIpAddresses":[{"frontendIpAddress":"20.55.51.220","privateIpAddress":"10.1.0.4"}],"inboundRules":[],"outboundRules":[]}}"#;

    #[test_case("blah", "blah:somevalue", "somevalue"; "single tag")]
    #[test_case("blah", "blah:somevalue;kukta:someothervalue", "somevalue"; "multiple tags")]
    #[test_case("kukta", "blah:somevalue;kukta:someothervalue", "someothervalue"; "last tag")]
    #[test_case("blah", "nonblah:somevalue;kukta:someothervalue", ""; "unrelated tags")]
    #[test_case("url", "url:http://example.com:8080", "http://example.com:8080"; "value with colons")]
    #[test_case("empty", "empty:;other:x", ""; "empty value")]
    #[test_case("blah", "blah;kukta:x", ""; "entry without separator")]
    #[test_case("blah", "", ""; "empty list")]
    #[test_case("blah", "blah:first;blah:second", "second"; "duplicate tags")]
    #[test_case("blah", "blah:first;kukta:x;blah:second;other:y", "second"; "duplicate tags apart")]
    fn tags(tag: &str, list: &str, want: &str) {
        assert_eq!(tag_value(tag, list), want);
    }

    #[test_case(LB, "loadbalancer/publicIpAddresses/0/frontendIpAddress", "20.55.51.220"; "external ip")]
    #[test_case(LB, "loadbalancer/publicIpAddresses/0/privateIpAddress", "10.1.0.4"; "private ip")]
    #[test_case(LB, "loadbalancer/publicIpAddresses/#", "1"; "array length")]
    #[test_case(LB, "loadbalancer/inboundRules", "[]"; "empty array")]
    #[test_case(LB, "loadbalancer/publicIpAddresses/1/frontendIpAddress", ""; "index out of range")]
    #[test_case(LB, "loadbalancer/publicIpAddresses/x", ""; "non numeric index")]
    #[test_case(LB, "loadbalancer/missing", ""; "missing key")]
    #[test_case(LB, "loadbalancer/publicIpAddresses/0/frontendIpAddress/more", ""; "path past a leaf")]
    #[test_case("not json", "loadbalancer", ""; "invalid json")]
    #[test_case(r#"{"a":{"n":42,"b":true,"z":null}}"#, "a/n", "42"; "number")]
    #[test_case(r#"{"a":{"n":42,"b":true,"z":null}}"#, "a/b", "true"; "boolean")]
    #[test_case(r#"{"a":{"n":42,"b":true,"z":null}}"#, "a/z", ""; "null")]
    #[test_case(r#"{"a":{"z":1,"b":2}}"#, "a", r#"{"z":1,"b":2}"#; "object keeps order")]
    #[test_case(r#"{"a": {"b": 1}}"#, "a", r#"{"b": 1}"#; "object keeps spacing")]
    #[test_case(r#"{"a":[1, 2]}"#, "a", "[1, 2]"; "array as written")]
    #[test_case(r#"{"n":1e2}"#, "n", "100"; "exponent")]
    #[test_case(r#"{"n":1.0}"#, "n", "1"; "integral float")]
    #[test_case(r#"{"n":-2.5}"#, "n", "-2.5"; "fraction")]
    #[test_case(r#"{"n":12345678901234567890}"#, "n", "12345678901234567890"; "large integer")]
    #[test_case(r#"{"s":"a\"b\u00e9"}"#, "s", "a\"b\u{e9}"; "escaped string")]
    #[test_case(r#"{"a\u0062":"x"}"#, "ab", "x"; "escaped key")]
    fn json(document: &str, path: &str, want: &str) {
        assert_eq!(json_value(document, path), want);
    }
}
