// Copyright 2025 The Pigweed Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License. You may obtain a copy of
// the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations under
// the License.

use std::fmt::Display;

use tmb_format::{format, Error, FormatString};

// Well formed strings render the same as `format!()`.
#[test]
fn matches_core_fmt_for_supported_conversions() {
    let name = "svc";
    let count = 5;
    let ratio = 0.125;
    let loss = -0.375;

    let cases: [(&str, &[&dyn Display], String); 14] = [
        ("count={}", &[&count], std::format!("count={}", count)),
        ("[{:5}]", &[&count], std::format!("[{:5}]", count)),
        ("[{:5}]", &[&name], std::format!("[{:5}]", name)),
        ("[{:8.3}]", &[&ratio], std::format!("[{:8.3}]", ratio)),
        ("[{:05}]", &[&count], std::format!("[{:05}]", count)),
        ("[{:07.2}]", &[&loss], std::format!("[{:07.2}]", loss)),
        ("[{:+}]", &[&count], std::format!("[{:+}]", count)),
        ("[{:*^9}]", &[&name], std::format!("[{:*^9}]", name)),
        ("[{:-^8}]", &[&count], std::format!("[{:-^8}]", count)),
        ("{} has {} items", &[&name, &count], std::format!("{} has {} items", name, count)),
        ("{1}/{0}", &[&name, &count], std::format!("{1}/{0}", name, count)),
        ("{:>6}|", &[&name], std::format!("{:>6}|", name)),
        ("{:.2}", &[&ratio], std::format!("{:.2}", ratio)),
        ("{{{}}}", &[&count], std::format!("{{{}}}", count)),
    ];

    for (format_string, args, expected) in cases {
        assert_eq!(format(format_string, args).unwrap(), expected, "{format_string}");
    }
}

#[test]
fn placeholder_without_argument_is_an_error() {
    assert_eq!(
        format("count={} of {}", &[&5]),
        Err(Error::MissingArgument {
            index: 1,
            supplied: 1
        })
    );
    assert_eq!(
        format("{2}", &[&5]),
        Err(Error::MissingArgument {
            index: 2,
            supplied: 1
        })
    );
}

#[test]
fn extra_arguments_are_ignored() {
    assert_eq!(format("static", &[&1, &2]).unwrap(), "static");
}

#[test]
fn parsed_strings_can_be_rendered_repeatedly() {
    let format_string = FormatString::parse("{}-{}").unwrap();
    assert_eq!(format_string.argument_count(), 2);
    assert_eq!(format_string.render(&[&1, &2]).unwrap(), "1-2");
    assert_eq!(format_string.render(&[&"a", &"b"]).unwrap(), "a-b");
}
