//! End-to-end extraction properties.

use factura_core::{
    extract_items, parse_amount, CatalogProduct, CatalogSnapshot, ExtractedItem,
    InvoiceItemParser, InvoiceParser, Strategy,
};
use pretty_assertions::assert_eq;

const MIXED_INVOICE: &str = "\
COMERCIAL VALPARAISO LTDA
R.U.T.: 77.654.325-K
Giro: Venta al por mayor de bebidas
Dirección: Av. Brasil 1450, Valparaíso
Fono: 322 456789
FACTURA ELECTRONICA N° 88231
Fecha de Emisión: 02/05/2024
Señor(es): Minimarket Don Pepe
Código   Descripción                          Cant   P.Unit
100234   CERVEZA KUNSTMANN LAGER 355CC CJ 24   2   18.990
100781   VINO GATO NEGRO CABERNET 750 ML     12   2.490
204455   PISCO MISTRAL 35,0 GRADOS 1LT       3   8.990
100999   BEBIDA COCA-COLA 3LT                6   2.790
SUBTOTAL NETO   111.570
IVA 19%   21.198
TOTAL   132.768
Timbre Electrónico SII";

fn catalog() -> Vec<CatalogProduct> {
    vec![
        CatalogProduct::new(10, "Cerveza Kunstmann Lager 355cc"),
        CatalogProduct::new(11, "Vino Gato Negro Cabernet"),
        CatalogProduct::new(12, "Pisco Mistral 35"),
    ]
}

fn fields(items: &[ExtractedItem]) -> Vec<(String, u32, u64, u64)> {
    items
        .iter()
        .map(|i| (i.raw_name.clone(), i.quantity, i.unit_price, i.subtotal))
        .collect()
}

fn assert_invariants(items: &[ExtractedItem]) {
    for item in items {
        assert_eq!(item.subtotal, item.unit_price * u64::from(item.quantity));
        assert!(item.quantity >= 1);
        assert!(item.raw_name.chars().count() >= 3, "{}", item.raw_name);
        assert!(item.raw_name.chars().any(char::is_alphabetic));
        assert_eq!(item.matched, item.matched_product.is_some());
    }
}

#[test]
fn test_mixed_invoice() {
    let items = extract_items(MIXED_INVOICE, &catalog()).unwrap();

    assert_eq!(
        fields(&items),
        vec![
            ("CERVEZA KUNSTMANN LAGER".to_string(), 2, 18_990, 37_980),
            ("VINO GATO NEGRO CABERNET".to_string(), 12, 2_490, 29_880),
            ("PISCO MISTRAL GRADOS".to_string(), 3, 8_990, 26_970),
            ("BEBIDA COCA-COLA".to_string(), 6, 2_790, 16_740),
        ]
    );
    assert_invariants(&items);

    let matched: Vec<Option<u64>> = items
        .iter()
        .map(|i| i.matched_product.as_ref().map(|p| p.id))
        .collect();
    assert_eq!(matched, vec![Some(10), Some(11), Some(12), None]);
}

#[test]
fn test_mixed_invoice_header_and_totals() {
    let result = InvoiceItemParser::new().parse(MIXED_INVOICE, &CatalogSnapshot::empty());

    assert_eq!(result.header.folio.as_deref(), Some("88231"));
    assert_eq!(result.header.supplier_rut.as_deref(), Some("77.654.325-K"));
    assert_eq!(result.header.net_total, Some(111_570));
    assert_eq!(result.header.document_total, Some(132_768));
    assert_eq!(result.items_total(), 111_570);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
}

#[test]
fn test_header_footer_table_bounding() {
    let text = "HEADER\nCODIGO DESCRIPCION PRECIO\n1234 PRODUCTO A 1 15.000\nSUBTOTAL 15.000";
    let items = extract_items(text, &[]).unwrap();

    assert_eq!(
        fields(&items),
        vec![("PRODUCTO A".to_string(), 1, 15_000, 15_000)]
    );
}

#[test]
fn test_fallback_activation() {
    let items = extract_items("WHISKY RESERVA 2 25000", &[]).unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[0].unit_price, 25_000);
    assert_eq!(items[0].subtotal, 50_000);
    assert_eq!(items[0].strategy, Strategy::UncodedRow);
}

#[test]
fn test_table_row_last_resort() {
    let text = "\
GOMITAS SURTIDAS 12 450
CHICLE MENTA BOLSA 6 390";
    let items = extract_items(text, &[]).unwrap();

    assert_eq!(
        fields(&items),
        vec![
            ("GOMITAS SURTIDAS".to_string(), 12, 450, 5_400),
            ("CHICLE MENTA BOLSA".to_string(), 6, 390, 2_340),
        ]
    );
    assert!(items.iter().all(|i| i.strategy == Strategy::TableRow));
}

#[test]
fn test_matcher_precision() {
    let catalog = vec![CatalogProduct::new(1, "Whisky Reserva 12 Años")];
    let snapshot = CatalogSnapshot::build(&catalog).unwrap();

    assert_eq!(snapshot.find_match("WHISKY RESERVA").map(|m| m.product.id), Some(1));
    assert_eq!(snapshot.find_match("CLAVOS 2 PULGADAS"), None);

    let items = extract_items("WHISKY RESERVA 2 25000", &catalog).unwrap();
    assert!(items[0].matched);
}

#[test]
fn test_noise_rejection() {
    let text = "RUT: 76.123.456-7 Fono: 223456";
    assert!(extract_items(text, &[]).unwrap().is_empty());

    let with_item = format!("{}\nWHISKY RESERVA 2 25000", text);
    let items = extract_items(&with_item, &[]).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].line_number, 2);
}

#[test]
fn test_empty_input() {
    assert!(extract_items("", &catalog()).unwrap().is_empty());
    assert!(extract_items("   \n\t\n  ", &catalog()).unwrap().is_empty());

    let result = InvoiceItemParser::new().parse("", &CatalogSnapshot::empty());
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_idempotence() {
    let snapshot = CatalogSnapshot::build(&catalog()).unwrap();
    let parser = InvoiceItemParser::new();

    let first = parser.parse(MIXED_INVOICE, &snapshot);
    let second = parser.parse(MIXED_INVOICE, &snapshot);

    assert_eq!(first.items, second.items);
    assert_eq!(first.header, second.header);
    assert_eq!(first.warnings, second.warnings);
}

#[test]
fn test_catalog_growth_only_changes_matches() {
    let small = extract_items(MIXED_INVOICE, &[]).unwrap();

    let mut grown = catalog();
    grown.push(CatalogProduct::new(13, "Bebida Coca-Cola 3L"));
    grown.push(CatalogProduct::new(14, "Agua Mineral"));
    let large = extract_items(MIXED_INVOICE, &grown).unwrap();

    assert_eq!(fields(&small), fields(&large));
    assert!(small.iter().all(|i| !i.matched));
    assert_eq!(large.iter().filter(|i| i.matched).count(), 4);
}

#[test]
fn test_malformed_catalog_fails_fast() {
    let catalog = vec![CatalogProduct::new(1, "Vino"), CatalogProduct::new(1, "Pisco")];
    assert!(extract_items("WHISKY RESERVA 2 25000", &catalog).is_err());
}

#[test]
fn test_locale_parsing() {
    assert_eq!(parse_amount("19.500"), Some(19_500));
    assert_eq!(parse_amount("1.200,50"), Some(1_200));
    assert_eq!(parse_amount("abc"), None);
    assert_eq!(parse_amount("12"), None);
}

#[test]
fn test_parser_is_shareable_across_threads() {
    let parser = std::sync::Arc::new(InvoiceItemParser::new());
    let snapshot = std::sync::Arc::new(CatalogSnapshot::build(&catalog()).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let parser = parser.clone();
            let snapshot = snapshot.clone();
            std::thread::spawn(move || parser.extract_items(MIXED_INVOICE, &snapshot).len())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 4);
    }
}
