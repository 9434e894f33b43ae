//! Behaviour-driven tests covering category resolution.

use std::cell::{Cell, RefCell};
use std::fs;
use std::sync::Arc;

mod support;

use camino::Utf8PathBuf;
use indexmap::IndexMap;
use lexis::catalogue::{Catalogue, decode};
use lexis::{CatalogueSource, LexisConfig, LexisError, SourceConfig, Translator};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use support::step::StepValue;
use tempfile::TempDir;

struct ResolutionWorld {
    _dir: TempDir,
    root: Utf8PathBuf,
    languages: RefCell<Vec<String>>,
    sources: RefCell<IndexMap<String, SourceConfig>>,
    auto_create: Cell<bool>,
    translator: RefCell<Option<Translator>>,
    category: RefCell<String>,
    outcome: RefCell<Option<Result<Arc<CatalogueSource>, LexisError>>>,
}

#[fixture]
fn world() -> ResolutionWorld {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf-8 path");
    ResolutionWorld {
        _dir: dir,
        root,
        languages: RefCell::new(Vec::new()),
        sources: RefCell::new(IndexMap::new()),
        auto_create: Cell::new(true),
        translator: RefCell::new(None),
        category: RefCell::new(String::new()),
        outcome: RefCell::new(None),
    }
}

fn resolved(world: &ResolutionWorld) -> Arc<CatalogueSource> {
    let borrow = world.outcome.borrow();
    match borrow.as_ref() {
        Some(Ok(source)) => Arc::clone(source),
        Some(Err(error)) => panic!("resolution failed: {error}"),
        None => panic!("the category should have been resolved"),
    }
}

#[given("a catalogue root supporting {languages}")]
fn catalogue_root(world: &ResolutionWorld, languages: StepValue) {
    let codes = languages.items();
    let document: IndexMap<&str, &str> = codes.iter().map(|code| (code.as_str(), code.as_str())).collect();
    let path = world.root.join("lib/i18n/languages.json");
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(&path, serde_json::to_string(&document).expect("encode")).expect("languages");
    world.languages.replace(codes);
}

#[given("the pattern {pattern} maps to inline messages in {language}")]
fn inline_pattern(world: &ResolutionWorld, pattern: StepValue, language: StepValue) {
    world.sources.borrow_mut().insert(
        pattern.into_inner(),
        SourceConfig::inline(&language.into_inner()),
    );
}

#[given("auto-creation is disabled")]
fn disable_auto_create(world: &ResolutionWorld) {
    world.auto_create.set(false);
}

fn write_catalogue(
    world: &ResolutionWorld,
    language: StepValue,
    category: StepValue,
    message: StepValue,
    translation: StepValue,
) {
    let path = world
        .root
        .join("translates")
        .join(language.into_inner())
        .join(format!("{}.json", category.into_inner()));
    let catalogue = Catalogue::from_iter([(message.into_inner(), translation.into_inner())]);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(&path, lexis::catalogue::encode(&catalogue).expect("encode")).expect("seed");
}

#[given("the {language} catalogue for {category} translates {message} to {translation}")]
fn seed_catalogue(
    world: &ResolutionWorld,
    language: StepValue,
    category: StepValue,
    message: StepValue,
    translation: StepValue,
) {
    write_catalogue(world, language, category, message, translation);
}

#[when("another process writes the {language} catalogue for {category} translating {message} to {translation}")]
fn write_catalogue_mid_run(
    world: &ResolutionWorld,
    language: StepValue,
    category: StepValue,
    message: StepValue,
    translation: StepValue,
) {
    write_catalogue(world, language, category, message, translation);
}

#[when("category {category} is resolved for {language}")]
fn resolve_category(world: &ResolutionWorld, category: StepValue, language: StepValue) {
    let mut slot = world.translator.borrow_mut();
    let translator = slot.get_or_insert_with(|| {
        let mut config = LexisConfig::rooted_at(world.root.clone());
        config.sources = world.sources.borrow().clone();
        config.auto_create = world.auto_create.get();
        Translator::from_config(&config)
    });

    let category = category.into_inner();
    let outcome = translator.resolver().resolve(&category, &language.into_inner());
    world.category.replace(category);
    world.outcome.replace(Some(outcome));
}

#[then("the resolved source language is {language}")]
fn assert_source_language(world: &ResolutionWorld, language: StepValue) {
    assert_eq!(resolved(world).source_language(), language.into_inner());
}

#[then("the resolved source is forced")]
fn assert_forced(world: &ResolutionWorld) {
    assert!(resolved(world).force_translation());
}

#[then("every language has a {category} catalogue holding only the sentinel")]
fn assert_placeholders(world: &ResolutionWorld, category: StepValue) {
    let category = category.into_inner();
    for language in world.languages.borrow().iter() {
        let path = world
            .root
            .join("translates")
            .join(language)
            .join(format!("{category}.json"));
        let text = fs::read_to_string(&path)
            .unwrap_or_else(|error| panic!("expected {path} to exist: {error}"));
        assert_eq!(decode(&text).expect("decode"), Catalogue::sentinel());
    }
}

#[then("resolution fails with a configuration error")]
fn assert_configuration_error(world: &ResolutionWorld) {
    let borrow = world.outcome.borrow();
    assert!(matches!(
        borrow.as_ref(),
        Some(Err(LexisError::Configuration { .. }))
    ));
    assert!(!world.root.join("translates").exists());
}

#[then("the resolved source translates {message} to {translation} in {language}")]
fn assert_translation(
    world: &ResolutionWorld,
    message: StepValue,
    translation: StepValue,
    language: StepValue,
) {
    let source = resolved(world);
    let category = world.category.borrow();
    let found = source.lookup(&category, &message.into_inner(), &language.into_inner());
    assert_eq!(found, Some(translation.into_inner()));
}

#[scenario(path = "tests/features/category_resolution.feature", index = 0)]
fn scenario_prefix_over_universal(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/category_resolution.feature", index = 1)]
fn scenario_exact_over_prefix(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/category_resolution.feature", index = 2)]
fn scenario_auto_create(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/category_resolution.feature", index = 3)]
fn scenario_auto_create_disabled(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/category_resolution.feature", index = 4)]
fn scenario_live_file_override(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/category_resolution.feature", index = 5)]
fn scenario_catalogue_created_mid_run(world: ResolutionWorld) {
    let _ = world;
}
