mod support;

use genaxis_core::db::open_db_in_memory;
use genaxis_core::ucsc::build_url;
use genaxis_core::{
    fetch_genes_for_species, FetchGenesRequest, GeneListQuery, GeneRepository,
    SpeciesRepository, SqliteGeneRepository, SqliteSpeciesRepository, UcscClient, UcscError,
    DEFAULT_SPECIES_NAME,
};
use support::{single_ref_gene_payload, FakeTransport, BASE_URL};

#[test]
fn build_url_joins_parameters_with_semicolons() {
    let url = build_url(
        "https://api.genome.ucsc.edu/",
        "getData/track",
        &[
            ("genome", "ce11".to_string()),
            ("track", "refGene".to_string()),
        ],
    );
    assert_eq!(
        url,
        "https://api.genome.ucsc.edu/getData/track?genome=ce11;track=refGene"
    );
    assert_eq!(
        build_url("https://x", "list/ucscGenomes", &[]),
        "https://x/list/ucscGenomes"
    );
}

#[test]
fn endpoints_request_expected_urls() {
    let transport = FakeTransport::ok("{}");
    let client = UcscClient::with_transport(&transport, BASE_URL);

    client.list_ucsc_genomes().unwrap();
    client.list_tracks("hg38").unwrap();
    client.fetch_track_data("ce11", "refGene", Some(5)).unwrap();
    client
        .fetch_sequence_for_region("hg38", "chrM", 0, 50, true)
        .unwrap();
    client.search_ucsc("BRCA1", "hg38", None).unwrap();
    client.search_ucsc("BRCA1", "hg38", Some("helpDocs")).unwrap();

    assert_eq!(
        transport.requests(),
        [
            "https://ucsc.test/list/ucscGenomes",
            "https://ucsc.test/list/tracks?genome=hg38",
            "https://ucsc.test/getData/track?genome=ce11;track=refGene;jsonOutputArrays=1;maxItemsOutput=5",
            "https://ucsc.test/getData/sequence?genome=hg38;chrom=chrM;start=0;end=50;revComp=1",
            "https://ucsc.test/search?search=BRCA1;genome=hg38",
            "https://ucsc.test/search?search=BRCA1;genome=hg38;categories=helpDocs",
        ]
    );
}

#[test]
fn http_error_status_is_propagated() {
    let transport = FakeTransport::with_status(500, "boom");
    let client = UcscClient::with_transport(&transport, BASE_URL);

    let err = client.list_tracks("hg38").unwrap_err();
    match err {
        UcscError::Status { status, body, url } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
            assert!(url.ends_with("list/tracks?genome=hg38"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_json_is_a_decode_error() {
    let transport = FakeTransport::ok("<html>");
    let client = UcscClient::with_transport(&transport, BASE_URL);

    assert!(matches!(
        client.list_ucsc_genomes().unwrap_err(),
        UcscError::Decode { .. }
    ));
}

#[test]
fn missing_track_yields_no_rows() {
    let transport = FakeTransport::ok(r#"{"columnTypes": []}"#);
    let client = UcscClient::with_transport(&transport, BASE_URL);

    assert!(client
        .fetch_gene_rows("ce11", "refGene", None)
        .unwrap()
        .is_empty());
}

#[test]
fn fetch_genes_for_species_persists_single_ref_gene_row() {
    let conn = open_db_in_memory().unwrap();
    let transport = FakeTransport::ok(single_ref_gene_payload());
    let client = UcscClient::with_transport(&transport, BASE_URL);

    let count = fetch_genes_for_species(&client, &conn, &FetchGenesRequest::new("ce11")).unwrap();
    assert_eq!(count, 1);

    let species = SqliteSpeciesRepository::new(&conn)
        .find_species_by_name(DEFAULT_SPECIES_NAME)
        .unwrap()
        .unwrap();
    assert_eq!(species.name, "Caenorhabditis elegans");

    let genes = SqliteGeneRepository::new(&conn)
        .list_genes(&GeneListQuery::default())
        .unwrap();
    assert_eq!(genes.len(), 1);
    let gene = &genes[0];
    assert_eq!(gene.species_id, species.id);
    assert_eq!(gene.name, "NM_001");
    assert_eq!(gene.attributes.name2.as_deref(), Some("unc-54"));
    assert_eq!(gene.attributes.chrom.as_deref(), Some("chrI"));
    assert_eq!(gene.attributes.strand.as_deref(), Some("+"));
    assert_eq!(gene.attributes.exon_starts.as_deref(), Some("100,500"));
    assert_eq!(gene.attributes.exon_frames.as_deref(), Some("0,1"));
    assert_eq!(gene.sequence, None);
}

#[test]
fn fetch_genes_for_species_skips_rows_without_chrom() {
    let conn = open_db_in_memory().unwrap();
    let payload = serde_json::json!({
        "refGene": [
            {"name": "NM_1", "chrom": "chrII", "strand": -1},
            {"name": "NM_2"}
        ]
    })
    .to_string();
    let transport = FakeTransport::ok(payload);
    let client = UcscClient::with_transport(&transport, BASE_URL);
    let mut request = FetchGenesRequest::new("ce11");
    request.species_name = Some("Test species".to_string());

    let count = fetch_genes_for_species(&client, &conn, &request).unwrap();
    assert_eq!(count, 1);
    assert!(SqliteSpeciesRepository::new(&conn)
        .find_species_by_name("Test species")
        .unwrap()
        .is_some());
}

#[test]
fn fetch_genes_for_species_with_empty_track_still_creates_species() {
    let conn = open_db_in_memory().unwrap();
    let transport = FakeTransport::ok(r#"{"refGene": {}}"#);
    let client = UcscClient::with_transport(&transport, BASE_URL);

    let count = fetch_genes_for_species(&client, &conn, &FetchGenesRequest::new("ce11")).unwrap();
    assert_eq!(count, 0);
    assert!(SqliteSpeciesRepository::new(&conn)
        .find_species_by_name(DEFAULT_SPECIES_NAME)
        .unwrap()
        .is_some());
}

#[test]
fn fetch_genes_for_species_without_track_creates_nothing() {
    let conn = open_db_in_memory().unwrap();
    let transport = FakeTransport::ok(r#"{"knownGene": {}}"#);
    let client = UcscClient::with_transport(&transport, BASE_URL);

    let count = fetch_genes_for_species(&client, &conn, &FetchGenesRequest::new("ce11")).unwrap();
    assert_eq!(count, 0);
    assert!(SqliteSpeciesRepository::new(&conn)
        .find_species_by_name(DEFAULT_SPECIES_NAME)
        .unwrap()
        .is_none());
}
