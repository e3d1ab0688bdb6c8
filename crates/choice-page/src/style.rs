//! Inline `style` attribute handling

/// Split a declaration list into `(property, value)` pairs, keeping order
pub(crate) fn parse(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim().to_ascii_lowercase();
            let value = value.trim();
            if prop.is_empty() || value.is_empty() {
                return None;
            }
            Some((prop, value.to_string()))
        })
        .collect()
}

pub(crate) fn serialize(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(prop, value)| format!("{}:{}", prop, value))
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style() {
        let decls = parse(" Width: 300px ; height:200px;;bogus; top: ");
        assert_eq!(
            decls,
            vec![
                ("width".to_string(), "300px".to_string()),
                ("height".to_string(), "200px".to_string()),
            ]
        );
        assert_eq!(serialize(&decls), "width:300px;height:200px");
    }
}
