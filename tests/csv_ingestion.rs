use simple_data_tool::ingestion::csv::{ingest_csv_from_path, ingest_csv_from_reader, read_records, read_records_from_path};
use simple_data_tool::model::{Agent, Claim, Customer, Policy};
use simple_data_tool::record::Record;
use simple_data_tool::types::{DataType, Field, Schema, Value};
use simple_data_tool::IngestionError;

fn flexible_reader(input: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input.as_bytes())
}

#[test]
fn decodes_customers_in_file_order() {
    let customers: Vec<Customer> = read_records_from_path("tests/fixtures/customers.csv").unwrap();

    assert_eq!(customers.len(), 8);
    assert_eq!(customers[0].first_name, "Gabbie");
    assert_eq!(customers[0].agent_id, 2);

    let bing = &customers[3];
    assert_eq!(bing.first_name, "Bing");
    assert_eq!(bing.last_name, "Vanns");
    assert_eq!(bing.state, "MT");
    assert_eq!(bing.secondary_language, "");

    let kim = &customers[7];
    assert_eq!(kim.age, 45);
    assert_eq!(kim.region, "South");
    assert_eq!(kim.primary_language, "Korean");
    assert_eq!(kim.secondary_language, "English");
    assert_eq!(kim.agent_id, 5);
}

#[test]
fn decodes_every_fixture_entity() {
    let agents: Vec<Agent> = read_records_from_path("tests/fixtures/agents.csv").unwrap();
    let policies: Vec<Policy> = read_records_from_path("tests/fixtures/policies.csv").unwrap();
    let claims: Vec<Claim> = read_records_from_path("tests/fixtures/claims.csv").unwrap();

    assert_eq!(agents.len(), 5);
    // Trailing empty column is still a field.
    assert_eq!(agents[2].secondary_language, "");
    assert_eq!(policies[0].premium_per_month, 120.50);
    assert_eq!(policies[8].customer_id, 99);
    assert_eq!(claims.len(), 10);
    // Booleans are case-insensitive.
    assert!(claims[2].is_claim_open);
    assert!(!claims[6].is_claim_open);
}

#[test]
fn untyped_dataset_follows_schema_order() {
    let schema = Schema::new(vec![
        Field::new("agentId", DataType::Int64),
        Field::new("lastName", DataType::Utf8),
    ]);
    let ds = ingest_csv_from_path("tests/fixtures/customers.csv", &schema).unwrap();

    assert_eq!(ds.row_count(), 8);
    assert_eq!(
        ds.rows[1],
        vec![Value::Int64(2), Value::Utf8("Redd".to_string())]
    );
}

#[test]
fn allows_reordered_columns() {
    let input = "claimType,isClaimOpen,id,policyId\nHail,true,1,10\n";
    let claims: Vec<Claim> = read_records(input.as_bytes()).unwrap();

    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].id, 1);
    assert_eq!(claims[0].policy_id, 10);
    assert_eq!(claims[0].claim_type, "Hail");
}

#[test]
fn errors_on_missing_required_column() {
    let input = "id,policyId,claimType\n1,10,Hail\n";
    let mut rdr = flexible_reader(input);

    let err = ingest_csv_from_reader(&mut rdr, &Claim::schema()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("missing required column 'isClaimOpen'"));
}

#[test]
fn errors_on_type_parse() {
    let input = "id,policyId,isClaimOpen,claimType\nnot_an_int,10,true,Hail\n";
    let mut rdr = flexible_reader(input);

    let err = ingest_csv_from_reader(&mut rdr, &Claim::schema()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("failed to parse value"));
    assert!(msg.contains("column 'id'"));
}

#[test]
fn bad_row_fails_the_whole_decode() {
    let err = read_records_from_path::<Claim>("tests/fixtures/claims_bad_bool.csv").unwrap_err();
    match err {
        IngestionError::ParseError { row, column, raw, .. } => {
            assert_eq!(row, 3);
            assert_eq!(column, "isClaimOpen");
            assert_eq!(raw, "maybe");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn errors_on_short_row() {
    let input = "id,customerId,policyType,startDate,premiumPerMonth\n1,2,Auto,01/01/2020,10.0\n2,3,Auto\n";
    let err = read_records::<Policy>(input.as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        IngestionError::FieldCount { row: 3, expected: 5, found: 3 }
    ));
}

#[test]
fn errors_on_duplicate_ids() {
    let input = "id,policyId,isClaimOpen,claimType\n1,10,true,Hail\n1,11,false,Fire\n";
    let err = read_records::<Claim>(input.as_bytes()).unwrap_err();
    assert_eq!(err.to_string(), "duplicate Claim id 1 at row 3");
}

#[test]
fn errors_on_negative_premium() {
    let input = "id,customerId,policyType,startDate,premiumPerMonth\n1,2,Auto,01/01/2020,-4.5\n";
    let err = read_records::<Policy>(input.as_bytes()).unwrap_err();
    assert!(matches!(err, IngestionError::InvalidRecord { entity: "Policy", row: 2, .. }));
}

#[test]
fn missing_file_is_source_not_found() {
    let err = read_records_from_path::<Agent>("tests/fixtures/does_not_exist.csv").unwrap_err();
    assert!(matches!(err, IngestionError::SourceNotFound { .. }));
    assert!(err.to_string().contains("does_not_exist.csv"));
}

#[test]
fn header_only_source_decodes_to_empty_collection() {
    let input = "id,firstName,lastName,state,region,primaryLanguage,secondaryLanguage\n";
    let agents: Vec<Agent> = read_records(input.as_bytes()).unwrap();
    assert!(agents.is_empty());
}
