// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Minimal streaming tag parser for OPF and container documents.
//!
//! Yields one [`TagEvent`] per text run or tag, each tagged with the dotted
//! path of the enclosing elements (for example `package.metadata.dc:title`).
//! This is not a validating XML parser: it only needs to walk well-formed
//! package documents.

/// Kind of tag event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagType {
    Begin,
    End,
    Single,
}

/// One step of the parse.
///
/// Text events carry `text` and the path of the enclosing element; tag
/// events carry `tag_name`, `tag_type` and attributes, with a path that
/// includes the tag itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagEvent {
    pub text: Option<String>,
    pub tag_path: String,
    pub tag_name: Option<String>,
    pub tag_type: Option<TagType>,
    pub attrs: Vec<(String, String)>,
}

impl TagEvent {
    /// Attribute value by exact name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Tag name without any namespace prefix.
    pub fn local_name(&self) -> Option<&str> {
        self.tag_name
            .as_deref()
            .map(|name| name.rsplit_once(':').map_or(name, |(_, local)| local))
    }

    fn text(text: String, tag_path: String) -> Self {
        Self {
            text: Some(text),
            tag_path,
            tag_name: None,
            tag_type: None,
            attrs: Vec::new(),
        }
    }

    fn tag(
        name: String,
        tag_type: TagType,
        tag_path: String,
        attrs: Vec<(String, String)>,
    ) -> Self {
        Self {
            text: None,
            tag_path,
            tag_name: Some(name),
            tag_type: Some(tag_type),
            attrs,
        }
    }
}

/// Iterator over the tag events of a document.
pub struct QuickParser<'a> {
    src: &'a str,
    pos: usize,
    stack: Vec<String>,
}

impl<'a> QuickParser<'a> {
    pub fn new(src: &'a str) -> Self {
        let src = src.strip_prefix('\u{feff}').unwrap_or(src);
        Self {
            src,
            pos: 0,
            stack: Vec::new(),
        }
    }

    fn path_with(&self, extra: Option<&str>) -> String {
        let mut parts: Vec<&str> = self.stack.iter().map(String::as_str).collect();
        parts.extend(extra);
        parts.join(".")
    }

    /// Advance past `terminator`, returning the text between the cursor
    /// (offset by `skip`) and the terminator.
    fn take_until(&mut self, skip: usize, terminator: &str) -> Option<&'a str> {
        let src = self.src;
        let rest = &src[self.pos + skip..];
        let end = rest.find(terminator)?;
        self.pos += skip + end + terminator.len();
        Some(&rest[..end])
    }

    /// Find the closing `>` of a tag starting at the cursor, honouring quotes.
    fn tag_end(&self) -> Option<usize> {
        let mut quote: Option<char> = None;
        for (offset, ch) in self.src[self.pos..].char_indices() {
            match (quote, ch) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(ch),
                (None, '>') => return Some(self.pos + offset),
                _ => {}
            }
        }
        None
    }

    fn parse_markup(&mut self) -> Option<Option<TagEvent>> {
        let src = self.src;
        let rest = &src[self.pos..];
        if rest.starts_with("<!--") {
            self.take_until(4, "-->")?;
            return Some(None);
        }
        if rest.starts_with("<![CDATA[") {
            let text = self.take_until(9, "]]>")?.to_string();
            return Some(Some(TagEvent::text(text, self.path_with(None))));
        }
        if rest.starts_with("<?") {
            self.take_until(2, "?>")?;
            return Some(None);
        }
        if rest.starts_with("<!") {
            self.pos = self.tag_end()? + 1;
            return Some(None);
        }

        let end = self.tag_end()?;
        let inner = &src[self.pos + 1..end];
        self.pos = end + 1;

        if let Some(name) = inner.strip_prefix('/') {
            let name = name.trim().to_string();
            let path = self.path_with(None);
            if let Some(idx) = self.stack.iter().rposition(|open| *open == name) {
                self.stack.truncate(idx);
            }
            return Some(Some(TagEvent::tag(name, TagType::End, path, Vec::new())));
        }

        let (inner, single) = match inner.strip_suffix('/') {
            Some(stripped) => (stripped, true),
            None => (inner, false),
        };
        let inner = inner.trim();
        let (name, attr_src) = inner
            .split_once(|c: char| c.is_ascii_whitespace())
            .unwrap_or((inner, ""));
        let name = name.to_string();
        let attrs = parse_attrs(attr_src);

        if single {
            let path = self.path_with(Some(name.as_str()));
            Some(Some(TagEvent::tag(name, TagType::Single, path, attrs)))
        } else {
            self.stack.push(name.clone());
            let path = self.path_with(None);
            Some(Some(TagEvent::tag(name, TagType::Begin, path, attrs)))
        }
    }
}

impl Iterator for QuickParser<'_> {
    type Item = TagEvent;

    fn next(&mut self) -> Option<TagEvent> {
        while self.pos < self.src.len() {
            if self.src[self.pos..].starts_with('<') {
                // Unterminated markup ends the stream.
                match self.parse_markup()? {
                    Some(event) => return Some(event),
                    None => continue,
                }
            }

            let rest = &self.src[self.pos..];
            let end = rest.find('<').unwrap_or(rest.len());
            self.pos += end;
            return Some(TagEvent::text(decode_entities(&rest[..end]), self.path_with(None)));
        }
        None
    }
}

fn parse_attrs(src: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut rest = src.trim_start();

    while !rest.is_empty() {
        let name_end = rest
            .find(|c: char| c == '=' || c.is_ascii_whitespace())
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let mut value = String::new();
        if let Some(after_eq) = rest.strip_prefix('=') {
            rest = after_eq.trim_start();
            match rest.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &rest[1..];
                    let close = body.find(quote).unwrap_or(body.len());
                    value = decode_entities(&body[..close]);
                    rest = body.get(close + 1..).unwrap_or("");
                }
                _ => {
                    let end = rest
                        .find(|c: char| c.is_ascii_whitespace())
                        .unwrap_or(rest.len());
                    value = decode_entities(&rest[..end]);
                    rest = &rest[end..];
                }
            }
        }

        if !name.is_empty() {
            attrs.push((name.to_string(), value));
        }
        rest = rest.trim_start();
    }
    attrs
}

/// Decode the predefined XML entities and numeric character references.
/// Unknown entities are kept verbatim.
pub fn decode_entities(src: &str) -> String {
    if !src.contains('&') {
        return src.to_string();
    }

    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').and_then(|semi| {
            let entity = &tail[1..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|ch| (ch, semi))
        });

        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
