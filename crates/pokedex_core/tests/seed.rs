use pokedex_core::db::open_db_in_memory;
use pokedex_core::{
    handle_request, ErrorKind, NewPokemon, Pagination, PokeApiEntry, PokeApiListing,
    PokemonService, SqlitePokemonRepository,
};
use serde_json::json;

fn entry(name: &str, no: u32) -> PokeApiEntry {
    PokeApiEntry {
        name: name.to_string(),
        url: format!("https://pokeapi.co/api/v2/pokemon/{no}/"),
    }
}

#[test]
fn seed_replaces_existing_records() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::try_new(&conn).unwrap(), 10);
    service.create(&NewPokemon::new(999, "placeholder")).unwrap();

    let listing = PokeApiListing {
        results: vec![entry("bulbasaur", 1), entry("Ivysaur", 2), entry("venusaur", 3)],
    };
    assert_eq!(service.seed(&listing).unwrap(), 3);

    let page = service.list(&Pagination::default()).unwrap();
    let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["bulbasaur", "ivysaur", "venusaur"]);
    assert_eq!(
        service.find_by_term("placeholder").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn duplicate_listing_rolls_back_and_keeps_prior_records() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::try_new(&conn).unwrap(), 10);
    let kept = service.create(&NewPokemon::new(1, "bulbasaur")).unwrap();

    let listing = PokeApiListing {
        results: vec![entry("pidgey", 16), entry("pidgey", 17)],
    };
    let err = service.seed(&listing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    assert_eq!(service.find_by_term("1").unwrap(), kept);
    assert_eq!(service.list(&Pagination::default()).unwrap().items.len(), 1);
}

#[test]
fn seed_route_accepts_pokeapi_payload() {
    let conn = open_db_in_memory().unwrap();
    let service = PokemonService::new(SqlitePokemonRepository::try_new(&conn).unwrap(), 10);
    let payload = json!({
        "count": 1302,
        "next": "https://pokeapi.co/api/v2/pokemon?offset=2&limit=2",
        "previous": null,
        "results": [
            { "name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/" },
            { "name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/" }
        ]
    })
    .to_string();

    let response = handle_request(&service, "POST", "/seed", Some(payload.as_str()));
    assert_eq!(response.status, 201);
    assert_eq!(response.body.unwrap()["inserted"], json!(2));
    assert_eq!(handle_request(&service, "GET", "/pokemon/2", None).status, 200);

    let broken = json!({ "results": [{ "name": "glitch", "url": "https://pokeapi.co/x/" }] })
        .to_string();
    assert_eq!(
        handle_request(&service, "POST", "/seed", Some(broken.as_str())).status,
        400
    );
}
