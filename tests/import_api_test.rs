// ==========================================
// ImportApi 集成测试
// ==========================================
// 测试目标: 流程存在校验、响应汇总、错误转换
// ==========================================


use licitacao_import::api::{ApiError, ImportApi};
use licitacao_import::logging;

#[test]
fn test_import_items_returns_outcome_and_file_name() {
    logging::init_test();

    let (_db_file, db_path) = test_helpers::create_test_db().unwrap();
    let seeded = test_helpers::seed_processes(&db_path).unwrap();
    let api = ImportApi::new(db_path);

    let csv = test_helpers::write_csv(
        "Descrição;Unidade;Quantidade;Valor Estimado;Fornecedor\n\
         Papel A4;caixa;10;25,50;Papelaria Central Ltda\n\
         Envelope;un;200;0,35;\n\
         ;;;;\n\
         Tesoura;un;abc;4,00;\n",
    )
    .unwrap();
    let file_path = csv.path().to_str().unwrap().to_string();

    let response = api.import_items(seeded.process_id, &file_path).unwrap();

    assert_eq!(response.process_id, seeded.process_id);
    assert!(response.file_name.starts_with("itens_"));
    assert!(response.file_name.ends_with(".csv"));
    assert_eq!(response.outcome.total_rows, 3);
    assert_eq!(response.outcome.created, 2);
    assert_eq!(response.outcome.failed, 1);
    assert_eq!(response.outcome.skipped_blank, 1);
    assert_eq!(response.outcome.errors[0].row, 4);
    assert_eq!(response.outcome.errors[0].reason, "invalid quantity");
    assert!(response.elapsed_ms >= 0);

    let items = api.list_items(seeded.process_id).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].supplier_id, Some(seeded.supplier_id));
    assert_eq!(items[1].description, "Envelope");
    assert_eq!(items[1].estimated_value.to_string(), "0.35");
}

#[test]
fn test_import_items_unknown_process() {
    let (_db_file, db_path) = test_helpers::create_test_db().unwrap();
    test_helpers::seed_processes(&db_path).unwrap();
    let api = ImportApi::new(db_path);

    let csv = test_helpers::write_csv("description;quantity;estimated value\nPapel;1;1\n").unwrap();
    let file_path = csv.path().to_str().unwrap().to_string();

    let result = api.import_items(9999, &file_path);
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[test]
fn test_import_items_file_level_errors() {
    let (_db_file, db_path) = test_helpers::create_test_db().unwrap();
    let seeded = test_helpers::seed_processes(&db_path).unwrap();
    let api = ImportApi::new(db_path);

    let csv = test_helpers::write_csv("descrição;unidade\nPapel;caixa\n").unwrap();
    let file_path = csv.path().to_str().unwrap().to_string();
    match api.import_items(seeded.process_id, &file_path) {
        Err(ApiError::ImportError(msg)) => {
            assert!(msg.contains("quantity"));
            assert!(msg.contains("estimated value"));
        }
        other => panic!("Expected ImportError, got {:?}", other.map(|r| r.outcome)),
    }

    let pdf = test_helpers::write_temp_file("%PDF-1.4", ".pdf").unwrap();
    let file_path = pdf.path().to_str().unwrap().to_string();
    assert!(matches!(
        api.import_items(seeded.process_id, &file_path),
        Err(ApiError::InvalidInput(_))
    ));

    assert!(api.list_items(seeded.process_id).unwrap().is_empty());
}

#[test]
fn test_response_serializes_to_json() {
    let (_db_file, db_path) = test_helpers::create_test_db().unwrap();
    let seeded = test_helpers::seed_processes(&db_path).unwrap();
    let api = ImportApi::new(db_path);

    let csv = test_helpers::write_csv("description;quantity;estimated value\n;1;1\n").unwrap();
    let file_path = csv.path().to_str().unwrap().to_string();

    let response = api.import_items(seeded.process_id, &file_path).unwrap();
    let json: serde_json::Value = serde_json::to_value(&response).unwrap();

    assert_eq!(json["outcome"]["total_rows"], 1);
    assert_eq!(json["outcome"]["failed"], 1);
    assert_eq!(json["outcome"]["errors"][0]["row"], 1);
    assert_eq!(json["outcome"]["errors"][0]["reason"], "missing description");
}
