// Parser behaviour on complete recipe documents
use recipe_recall::parser::{build_step_tree, extract_materials, parse_recipe, ParseError};
use recipe_recall::StepNode;
use std::collections::BTreeSet;

const HONGSHAOROU: &str = include_str!("fixtures/hongshaorou.md");
const NO_SECTIONS: &str = include_str!("fixtures/no_sections.md");
const BAD_HEADING: &str = include_str!("fixtures/bad_heading.md");

#[test]
fn test_parse_hongshaorou() {
    let recipe = parse_recipe(HONGSHAOROU).unwrap();

    assert_eq!(recipe.title, "红烧肉的做法");
    assert_eq!(recipe.difficulty.as_deref(), Some("★★★★"));
    assert_eq!(recipe.difficulty_level(), Some(4));
    assert_eq!(
        recipe.materials,
        vec!["五花肉", "带皮", "冰糖", "生抽", "老抽", "葱", "姜", "八角", "2 个", "料酒", "适量"]
    );
    assert_eq!(recipe.estimation, "每份：\n\n- 五花肉 500g\n- 冰糖 15g");
    assert_eq!(
        recipe.additional_info,
        vec!["可以加入鹌鹑蛋一起炖", "参考资料：家常菜谱"]
    );
}

#[test]
fn test_hongshaorou_step_tree() {
    let recipe = parse_recipe(HONGSHAOROU).unwrap();

    let top: Vec<_> = recipe.steps.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(top, vec!["五花肉切块", "炒糖色", "下肉翻炒上色", "加水炖煮 60 分钟"]);

    let first = &recipe.steps[0];
    assert_eq!(first.children.len(), 2);
    assert_eq!(first.children[1].text, "冷水下锅焯水");

    let sugar = &recipe.steps[1];
    assert_eq!(sugar.depth(), 3);
    assert_eq!(sugar.children[0].children[0].text, "冰糖变成琥珀色即可");
}

#[test]
fn test_materials_cardinality_invariant() {
    for doc in [HONGSHAOROU, NO_SECTIONS] {
        let recipe = parse_recipe(doc).unwrap();
        assert_eq!(recipe.materials.len(), recipe.materials_dirty.len());
    }
}

#[test]
fn test_document_without_sections() {
    let recipe = parse_recipe(NO_SECTIONS).unwrap();
    assert_eq!(recipe.title, "白粥的做法");
    assert_eq!(recipe.difficulty.as_deref(), Some("★"));
    assert!(recipe.materials.is_empty());
    assert!(recipe.steps.is_empty());
    assert_eq!(recipe.estimation, "");
}

#[test]
fn test_unlisted_heading_reports_exact_set() {
    let err = parse_recipe(BAD_HEADING).unwrap_err();
    let expected = BTreeSet::from(["## 不存在".to_string()]);
    assert_eq!(err, ParseError::UnexpectedHeadings(expected));
}

#[test]
fn test_indentation_forest() {
    let forest = build_step_tree("- a\n  - b\n  - c\n- d");
    let expected = vec![
        StepNode {
            text: "a".to_string(),
            children: vec![StepNode::new("b"), StepNode::new("c")],
        },
        StepNode::new("d"),
    ];
    assert_eq!(forest, expected);
}

#[test]
fn test_step_tree_is_idempotent() {
    let body = parse_recipe(HONGSHAOROU).unwrap().steps;
    let again = parse_recipe(HONGSHAOROU).unwrap().steps;
    assert_eq!(body, again);
}

#[test]
fn test_parenthesized_aside_removed() {
    let tokens = extract_materials("五花肉（切片）300g");
    assert!(tokens.dirty.iter().any(|t| t == "五花肉"));
    assert_eq!(tokens.cleaned[0], "五花肉");
    for token in tokens.cleaned {
        assert!(!token.contains(['（', '）', '(', ')']));
    }
}

#[test]
fn test_recipe_json_shape() {
    let recipe = parse_recipe(HONGSHAOROU).unwrap();
    let json = serde_json::to_value(&recipe).unwrap();

    assert_eq!(json["title"], "红烧肉的做法");
    assert!(json["materials_dirty"].is_array());
    assert_eq!(json["steps"][0]["children"][0]["text"], "切成 3 厘米见方");

    let back: recipe_recall::Recipe = serde_json::from_value(json).unwrap();
    assert_eq!(back, recipe);
}
