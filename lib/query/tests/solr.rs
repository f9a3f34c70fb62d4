mod common;

use fcrepo_model::FieldKind;
use fcrepo_query::{
    FieldMapping, MappedField, PredicateTree, QueryError, SearchQuery, SolrCompiler, SolrNaming,
};
use serde_json::json;

fn mapping() -> FieldMapping {
    FieldMapping::from_schema(&common::thesis(), &SolrNaming, &common::languages()).unwrap()
}

fn compile_filter(tree: PredicateTree) -> Result<String, QueryError> {
    let mapping = mapping();
    SolrCompiler::new(&mapping)
        .compile(&SearchQuery::new().filter(tree))
        .map(|query| query.q)
}

#[test]
fn fulltext_lookup_is_not_quoted() {
    let mut mapping = FieldMapping::new("thesis.models.Thesis", "thesis_models_Thesis");
    mapping
        .insert(MappedField::new("creator", "dc_creator_t", FieldKind::Text))
        .unwrap();
    let query = SolrCompiler::new(&mapping)
        .compile(&SearchQuery::new().filter(PredicateTree::lookup("creator__fulltext", "Smith")))
        .unwrap();
    assert_eq!(query.q, "dc_creator_t:Smith");
    assert_eq!(query.fq, r#"(fedora_mixin_types_t:"Thesis")"#);
}

#[test]
fn empty_query_matches_everything() {
    let mapping = mapping();
    let query = SolrCompiler::new(&mapping)
        .compile(&SearchQuery::new())
        .unwrap();
    assert_eq!(query.q, "*:*");
    assert_eq!(query.rows, 100);
}

#[test]
fn connectors_and_negation() {
    let tree = PredicateTree::and([
        PredicateTree::lookup("title@cs__exact", "Ochrana prirody"),
        !(PredicateTree::lookup("creator__startswith", "Nov")
            | PredicateTree::lookup("year__gte", 2010)),
        !PredicateTree::lookup("subject__endswith", "try"),
    ]);
    insta::assert_snapshot!(
        compile_filter(tree).unwrap(),
        @r#"(cs__title_ts:"^^^^Ochrana prirody$$$$" && (-(creator_ts:"^^^^Nov" || year_s:[2010 TO *])) && -subject_ts:"try$$$$")"#
    );
}

#[test]
fn values_are_escaped() {
    insta::assert_snapshot!(
        compile_filter(PredicateTree::lookup("creator__contains", "a:b (c)")).unwrap(),
        @r#"creator_ts:"a\:b \(c\)""#
    );
    insta::assert_snapshot!(
        compile_filter(PredicateTree::lookup("subject__in", json!(["x", 1]))).unwrap(),
        @r#"(subject_ts:"x" || subject_ts:"1")"#
    );
}

#[test]
fn ordering_uses_sort_fields() {
    let mapping = mapping();
    let query = SolrCompiler::new(&mapping)
        .compile(
            &SearchQuery::new()
                .order_by(["-title@cs", "year"])
                .request_facets(["subject"])
                .slice(10, Some(30)),
        )
        .unwrap();
    assert_eq!(query.sort, ["sort__cs__title_s desc", "year_s asc"]);
    assert_eq!(query.facet_fields, ["subject_ts"]);
    assert_eq!((query.start, query.rows), (10, 20));

    let params = query.to_params();
    assert!(params.contains(&("sort".to_owned(), "sort__cs__title_s desc,year_s asc".to_owned())));
    assert!(params.contains(&("facet".to_owned(), "true".to_owned())));
    assert!(params.contains(&("facet.field".to_owned(), "subject_ts".to_owned())));
}

#[test]
fn lookups_through_links_are_rejected() {
    for lookup in ["supervisor__name__exact", "a__b__c"] {
        assert!(
            matches!(
                compile_filter(PredicateTree::lookup(lookup, "x")),
                Err(QueryError::LinkTraversal { .. })
            ),
            "{lookup}"
        );
    }
}

#[test]
fn string_operators_require_string_fields() {
    assert!(matches!(
        compile_filter(PredicateTree::lookup("year__startswith", "20")),
        Err(QueryError::UnsupportedOperator { .. })
    ));
    assert!(matches!(
        compile_filter(PredicateTree::lookup("supervisor", "x")),
        Err(QueryError::UnknownField { .. })
    ));
}
