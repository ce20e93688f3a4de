use pokedex_core::db::open_db_in_memory;
use pokedex_core::{
    ErrorKind, NewPokemon, NotFoundTarget, Pagination, PokemonPatch, PokemonService,
    PokemonServiceError, SqlitePokemonRepository,
};
use uuid::Uuid;

#[test]
fn created_record_is_reachable_by_number_and_any_name_casing() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::try_new(&conn).unwrap(), 7);

    let created = service.create(&NewPokemon::new(1, "Bulbasaur")).unwrap();
    assert_eq!(created.name, "bulbasaur");
    assert_eq!(service.find_by_term("1").unwrap(), created);
    assert_eq!(service.find_by_term("BULBASAUR").unwrap(), created);
}

#[test]
fn second_create_with_same_number_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::try_new(&conn).unwrap(), 7);

    service.create(&NewPokemon::new(1, "Bulbasaur")).unwrap();
    let err = service.create(&NewPokemon::new(1, "Ivysaur")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(service.find_by_term("1").unwrap().name, "bulbasaur");
}

#[test]
fn invalid_create_input_is_a_validation_error() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::try_new(&conn).unwrap(), 7);

    let err = service.create(&NewPokemon::new(-1, "glitch")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn list_uses_configured_default_limit() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::try_new(&conn).unwrap(), 3);
    for no in 1..=5 {
        service
            .create(&NewPokemon::new(no, format!("pokemon-{no}")))
            .unwrap();
    }

    let page = service.list(&Pagination::default()).unwrap();
    assert_eq!(page.applied_limit, 3);
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.items[0].no, 1);

    let window = service
        .list(&Pagination {
            limit: Some(2),
            offset: 1,
        })
        .unwrap();
    let numbers: Vec<i64> = window.items.iter().map(|pokemon| pokemon.no).collect();
    assert_eq!(numbers, vec![2, 3]);
}

#[test]
fn update_lowercases_name_and_keeps_number() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::try_new(&conn).unwrap(), 7);
    let created = service.create(&NewPokemon::new(150, "mew")).unwrap();

    let patch = PokemonPatch {
        no: None,
        name: Some("Mewtwo".to_string()),
    };
    service.update(&created.id.to_string(), &patch).unwrap();

    let refetched = service.find_by_term("150").unwrap();
    assert_eq!(refetched.name, "mewtwo");
    assert_eq!(refetched.no, 150);
}

#[test]
fn remove_then_lookup_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::try_new(&conn).unwrap(), 7);
    let created = service.create(&NewPokemon::new(25, "Pikachu")).unwrap();

    service.remove(created.id).unwrap();

    for term in ["25", "pikachu"] {
        let err = service.find_by_term(term).unwrap_err();
        assert!(matches!(
            err,
            PokemonServiceError::NotFound(NotFoundTarget::Term(_))
        ));
    }
}

#[test]
fn remove_unknown_id_targets_the_id() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::try_new(&conn).unwrap(), 7);
    let missing = Uuid::new_v4();

    let err = service.remove(missing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(
        err,
        PokemonServiceError::NotFound(NotFoundTarget::Id(id)) if id == missing
    ));
}

#[test]
fn storage_failures_become_generic_internal_errors() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::try_new(&conn).unwrap(), 7);
    conn.execute_batch("DROP TABLE pokemon;").unwrap();

    let err = service.create(&NewPokemon::new(1, "bulbasaur")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(err.to_string(), "Can't create Pokemon - check server logs");
    assert!(!err.to_string().contains("no such table"));
}
