//! 模板扫描器
//! 从左到右切分模板字符串，得到字面量片段与占位符片段

/// 模板片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// 字面量文本（原样进入正则，不做转义）
    Literal(String),
    /// 占位符 `{name}` 或 `{name:constraint}`
    Placeholder {
        name: String,
        /// 约束表达式，`\{` / `\}` 已还原为 `{` / `}`
        constraint: Option<String>,
    },
}

/// 模板扫描器
pub struct TemplateScanner;

impl TemplateScanner {
    /// 扫描模板，返回有序片段列表
    ///
    /// 无法构成占位符的 `{`（未闭合、名称为空）按字面量保留，
    /// 由后续的格式串解析负责报错。
    pub fn scan(pattern: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = pattern;

        while let Some(c) = rest.chars().next() {
            if c == '{' {
                if let Some((segment, consumed)) = Self::parse_placeholder(&rest[1..]) {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(segment);
                    rest = &rest[1 + consumed..];
                    continue;
                }
            }
            literal.push(c);
            rest = &rest[c.len_utf8()..];
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        segments
    }

    /// 解析 `{` 之后的内容，成功时返回占位符片段及消耗的字节数（含结尾 `}`）
    fn parse_placeholder(input: &str) -> Option<(Segment, usize)> {
        let mut chars = input.char_indices().peekable();
        let mut name = String::new();

        // 1. 占位符名称：直到 `:` 或 `}`
        let has_constraint = loop {
            let (_, c) = chars.next()?;
            match c {
                '}' => break false,
                ':' => break true,
                _ => name.push(c),
            }
        };
        if name.is_empty() {
            return None;
        }

        if !has_constraint {
            let consumed = name.len() + 1;
            return Some((Segment::Placeholder { name, constraint: None }, consumed));
        }

        // 2. 约束表达式：直到未转义的 `}`
        let mut constraint = String::new();
        while let Some((idx, c)) = chars.next() {
            match c {
                '\\' => match chars.peek() {
                    Some(&(_, next @ ('{' | '}'))) => {
                        constraint.push(next);
                        chars.next();
                    }
                    _ => constraint.push(c),
                },
                '}' => {
                    let segment = Segment::Placeholder {
                        name,
                        constraint: Some(constraint),
                    };
                    return Some((segment, idx + 1));
                }
                _ => constraint.push(c),
            }
        }

        // 约束未闭合
        None
    }

    /// 提取占位符名称（按出现顺序，含重复）
    pub fn placeholder_names(segments: &[Segment]) -> impl Iterator<Item = &str> {
        segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}
