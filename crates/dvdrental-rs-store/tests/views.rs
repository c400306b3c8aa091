//! Reporting view tests.

use dvdrental_rs_schema::sql::{ColumnRef, Select};
use dvdrental_rs_store::{Money, Queries, Rating};
use dvdrental_rs_test_utils::seeded_database;
use pretty_assertions::assert_eq;

#[test]
fn customer_list_joins_address_city_and_country() {
    let db = seeded_database();
    let customers = db.customer_list().expect("customer_list");
    assert_eq!(customers.len(), 3);

    let betty = customers
        .iter()
        .find(|customer| customer.id == 14)
        .expect("customer 14");
    assert_eq!(betty.name, "Betty White");
    assert_eq!(betty.address, "770 Bydgoszcz Avenue");
    assert_eq!(betty.zip_code.as_deref(), Some("16266"));
    assert_eq!(betty.city, "Citrus Heights");
    assert_eq!(betty.country, "United States");
    assert_eq!(betty.notes, "active");
    assert_eq!(betty.sid, 2);
}

#[test]
fn film_list_concatenates_actor_names() {
    let db = seeded_database();
    let films = db.film_list().expect("film_list");
    let ids: Vec<i64> = films.iter().map(|film| film.fid).collect();
    assert_eq!(ids, vec![1, 2, 4, 133]);

    let first = &films[0];
    assert_eq!(first.category, "Documentary");
    assert_eq!(first.price, Money::from_cents(99));
    assert_eq!(first.rating, Some(Rating::Pg));
    assert_eq!(
        first.actors,
        "Penelope Guiness, Christian Gable, Lucille Tracy, Sandra Peck, Johnny Cage, \
         Mena Temple, Warren Nolte, Oprah Kilmer, Rock Dukakis, Mary Keitel"
    );
}

#[test]
fn nicer_film_list_capitalizes_and_joins_names() {
    let db = seeded_database();
    let films = db.nicer_but_slower_film_list().expect("film list");
    assert_eq!(films.len(), 4);
    assert_eq!(films[1].fid, 2);
    assert_eq!(films[1].actors, "GinaDegeneres, RockDukakis");
    assert_eq!(films[0].price, Money::from_cents(99));
}

#[test]
fn sales_by_film_category_orders_by_total() {
    let db = seeded_database();
    let sales = db.sales_by_film_category().expect("sales");
    let rows: Vec<(&str, i64)> = sales
        .iter()
        .map(|row| (row.category.as_str(), row.total_sales.cents()))
        .collect();
    assert_eq!(
        rows,
        vec![("Sports", 1696), ("Documentary", 697), ("Horror", 599)]
    );
}

#[test]
fn sales_by_store_orders_by_country() {
    let db = seeded_database();
    let sales = db.sales_by_store().expect("sales");
    assert_eq!(sales.len(), 2);
    assert_eq!(sales[0].store, "Woodridge,Australia");
    assert_eq!(sales[0].manager, "Jon Stephens");
    assert_eq!(sales[0].total_sales, Money::from_cents(1696));
    assert_eq!(sales[1].store, "Lethbridge,Canada");
    assert_eq!(sales[1].total_sales, "12.96".parse::<Money>().expect("money"));
}

#[test]
fn staff_list_reads_first_staff_member() {
    let db = seeded_database();
    let staff = db.staff_list().expect("staff_list");
    assert_eq!(staff.len(), 2);
    let mike = &staff[0];
    assert_eq!(mike.id, 1);
    assert_eq!(mike.name, "Mike Hillyer");
    assert_eq!(mike.address, "23 Workhaven Lane");
    assert_eq!(mike.zip_code.as_deref(), Some(""));
    assert_eq!(mike.phone, "14033335568");
    assert_eq!(mike.city, "Lethbridge");
    assert_eq!(mike.country, "Canada");
    assert_eq!(mike.sid, 1);
}

#[test]
fn view_counts_cover_every_view() {
    let db = seeded_database();
    let counts = db.view_counts().expect("counts");
    let pairs: Vec<(&str, i64)> = counts
        .iter()
        .map(|count| (count.view.as_str(), count.rows))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("customer_list", 3),
            ("film_list", 4),
            ("nicer_but_slower_film_list", 4),
            ("sales_by_film_category", 3),
            ("sales_by_store", 2),
            ("staff_list", 2),
        ]
    );
}

/// Columns with spaces in their names can be filtered through the builder.
#[test]
fn customer_list_filters_on_quoted_zip_code() {
    let db = seeded_database();
    let compiled = Select::new("customer_list")
        .column(ColumnRef::new("customer_list", "id"))
        .filter(ColumnRef::new("customer_list", "zip code").eq("16266"))
        .compile();
    let mut stmt = db.connection().prepare(&compiled.sql).expect("prepare");
    let ids: Vec<i64> = stmt
        .query_map(&[(":zip_code_1", &"16266")], |row| row.get(0))
        .expect("query")
        .collect::<Result<_, _>>()
        .expect("rows");
    assert_eq!(ids, vec![14]);
}
