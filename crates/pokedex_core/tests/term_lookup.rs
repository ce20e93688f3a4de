use pokedex_core::db::open_db_in_memory;
use pokedex_core::{NewPokemon, PokemonRepository, RepoError, SqlitePokemonRepository};
use uuid::Uuid;

#[test]
fn number_id_and_name_resolve_to_the_same_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePokemonRepository::try_new(&conn).unwrap();
    let created = repo
        .create_pokemon(&NewPokemon::new(6, "Charizard"))
        .unwrap();

    for term in [
        "6".to_string(),
        " 6 ".to_string(),
        created.id.to_string(),
        "charizard".to_string(),
        "  CharIZard ".to_string(),
    ] {
        assert_eq!(repo.find_by_term(&term).unwrap(), created, "term `{term}`");
    }
}

#[test]
fn missing_number_id_and_name_are_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePokemonRepository::try_new(&conn).unwrap();
    repo.create_pokemon(&NewPokemon::new(1, "bulbasaur")).unwrap();

    for term in ["999".to_string(), Uuid::new_v4().to_string(), "mewthree".to_string()] {
        let err = repo.find_by_term(&term).unwrap_err();
        assert!(
            matches!(err, RepoError::TermNotFound(ref missing) if missing == &term),
            "term `{term}` should be missing"
        );
    }
}

#[test]
fn numeric_terms_prefer_pokedex_number_over_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePokemonRepository::try_new(&conn).unwrap();
    let bulbasaur = repo.create_pokemon(&NewPokemon::new(1, "bulbasaur")).unwrap();
    let numeric_name = repo.create_pokemon(&NewPokemon::new(2, "1")).unwrap();

    assert_eq!(repo.find_by_term("1").unwrap(), bulbasaur);
    assert_eq!(
        repo.find_by_term(&numeric_name.id.to_string()).unwrap(),
        numeric_name
    );
}

#[test]
fn numeric_term_without_matching_number_falls_through_to_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePokemonRepository::try_new(&conn).unwrap();
    let created = repo.create_pokemon(&NewPokemon::new(5, "404")).unwrap();

    assert_eq!(repo.find_by_term("404").unwrap(), created);
}

#[test]
fn fractional_numbers_never_match_a_pokedex_number() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePokemonRepository::try_new(&conn).unwrap();
    repo.create_pokemon(&NewPokemon::new(1, "bulbasaur")).unwrap();

    assert!(matches!(
        repo.find_by_term("1.5").unwrap_err(),
        RepoError::TermNotFound(_)
    ));
    assert_eq!(repo.find_by_term("1.0").unwrap().name, "bulbasaur");
}
