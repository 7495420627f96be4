use sea_orm::sea_query::LikeExpr;
use sea_orm::{ColumnTrait, Condition};

/// 转义 LIKE 模式中的通配符，搜索词按字面匹配
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `col LIKE '%term%' ESCAPE '\'`
pub fn contains_term<C: ColumnTrait>(col: C, term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like_pattern(term));
    Condition::all().add(col.like(LikeExpr::new(pattern).escape('\\')))
}

/// 多个列中任意一列包含搜索词
pub fn any_contains<C: ColumnTrait>(cols: &[C], term: &str) -> Condition {
    cols.iter()
        .fold(Condition::any(), |cond, col| cond.add(contains_term(*col, term)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape_like_pattern("100%"), "100\\%");
        assert_eq!(escape_like_pattern("a_b"), "a\\_b");
        assert_eq!(escape_like_pattern("#1001"), "#1001");
    }
}
