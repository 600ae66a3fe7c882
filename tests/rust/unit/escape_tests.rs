//! Lucene escaping of free text used inside index start expressions

#[cfg(test)]
mod escape_tests {
    use cypher_builder::utils::lucene::escape;
    use cypher_builder::QueryBuilder;
    use test_case::test_case;

    #[test_case("AND OR", "\\AND\\ \\OR" ; "keywords and separator")]
    #[test_case("Lisa", "Lisa" ; "plain word")]
    #[test_case("Lisa Simpson", "Lisa Simpson" ; "plain words keep spaces")]
    #[test_case("name: Lisa", "name\\: Lisa" ; "field separator")]
    #[test_case("+a -b", "\\+a \\-b" ; "required and prohibited")]
    #[test_case("(a) {b} [c]", "\\(a\\) \\{b\\} \\[c\\]" ; "grouping and ranges")]
    #[test_case("a^2~0.8", "a\\^2\\~0.8" ; "boost and fuzzy")]
    #[test_case("wild*card?", "wild\\*card\\?" ; "wildcards")]
    #[test_case("\"quoted\"", "\\\"quoted\\\"" ; "phrase quotes")]
    #[test_case("!x", "\\!x" ; "bang")]
    #[test_case("x && y || z", "x \\&& y \\|| z" ; "boolean operators")]
    #[test_case("Homer NOT Bart", "Homer \\NOT\\ Bart" ; "keyword inside text")]
    #[test_case("NOTHING ORDER ANDY", "NOTHING ORDER ANDY" ; "keyword prefixes untouched")]
    fn test_escape(input: &str, expected: &str) {
        assert_eq!(escape(input), expected);
    }

    #[test]
    fn test_builder_escape_matches_util() {
        assert_eq!(QueryBuilder::escape("AND OR"), escape("AND OR"));
    }

    #[test]
    fn test_escaped_text_in_start_expression() {
        let mut query = QueryBuilder::detached();
        let text = format!("name:{}", QueryBuilder::escape("Homer (Sr.)"));
        query.start_at([("n", format!("node:SIMPSONS(\"{}\")", text))]);
        query.returns("n");
        assert_eq!(
            query.build_query(),
            "START n=node:SIMPSONS(\"name:Homer \\(Sr.\\)\") RETURN n"
        );
    }
}
