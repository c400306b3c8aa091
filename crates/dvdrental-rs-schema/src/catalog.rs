//! The dvdrental sample schema.
//!
//! Tables follow the introspected Postgres layout. View bodies are written in
//! the SQLite dialect: `||` concatenation, `substr`, and the two-argument
//! ordered `group_concat` in place of the custom Postgres aggregate.

use crate::model::{
    Column, ColumnType, ForeignKey, Index, ReferentialAction, Relationship, Schema, ServerDefault,
    Table, View,
};

/// Postgres enum backing `film.rating`.
pub const MPAA_RATINGS: [&str; 5] = ["G", "PG", "PG-13", "R", "NC-17"];

fn serial(table: &str, column: &str) -> Column {
    Column::new(column, ColumnType::Integer)
        .primary_key()
        .default_value(ServerDefault::Sequence(format!("{table}_{column}_seq")))
}

fn last_update() -> Column {
    Column::new("last_update", ColumnType::Timestamp)
        .not_null()
        .default_value(ServerDefault::Now)
}

fn text(name: &str, length: u32) -> Column {
    Column::new(name, ColumnType::varchar(length))
}

fn rating() -> ColumnType {
    ColumnType::enumeration("mpaa_rating", &MPAA_RATINGS)
}

/// The complete dvdrental schema under the `public` namespace.
pub fn dvdrental() -> Schema {
    Schema::with_namespace("public")
        .table(actor())
        .table(category())
        .table(country())
        .table(city())
        .table(address())
        .table(language())
        .table(film())
        .table(film_actor())
        .table(film_category())
        .table(inventory())
        .table(customer())
        .table(staff())
        .table(store())
        .table(rental())
        .table(payment())
        .view(customer_list())
        .view(film_list())
        .view(nicer_but_slower_film_list())
        .view(sales_by_film_category())
        .view(sales_by_store())
        .view(staff_list())
}

fn actor() -> Table {
    Table::new("actor")
        .column(serial("actor", "actor_id"))
        .column(text("first_name", 45).not_null())
        .column(text("last_name", 45).not_null())
        .column(last_update())
        .index(Index::new("idx_actor_last_name", &["last_name"]))
        .relationship(Relationship::many_to_many("films", "film", "film_actor"))
}

fn category() -> Table {
    Table::new("category")
        .column(serial("category", "category_id"))
        .column(text("name", 25).not_null())
        .column(last_update())
        .relationship(Relationship::many_to_many("films", "film", "film_category"))
}

fn country() -> Table {
    Table::new("country")
        .column(serial("country", "country_id"))
        .column(text("country", 50).not_null())
        .column(last_update())
        .relationship(Relationship::one_to_many("cities", "city"))
}

fn city() -> Table {
    Table::new("city")
        .column(serial("city", "city_id"))
        .column(text("city", 50).not_null())
        .column(Column::new("country_id", ColumnType::Integer).not_null())
        .column(last_update())
        .foreign_key(ForeignKey::new("country_id", "country", "country_id"))
        .index(Index::new("idx_fk_country_id", &["country_id"]))
        .relationship(Relationship::many_to_one("country", "country"))
}

fn address() -> Table {
    Table::new("address")
        .column(serial("address", "address_id"))
        .column(text("address", 50).not_null())
        .column(text("address2", 50))
        .column(text("district", 20).not_null())
        .column(Column::new("city_id", ColumnType::Integer).not_null())
        .column(text("postal_code", 10))
        .column(text("phone", 20).not_null())
        .column(last_update())
        .foreign_key(ForeignKey::new("city_id", "city", "city_id"))
        .index(Index::new("idx_fk_city_id", &["city_id"]))
        .relationship(Relationship::many_to_one("city", "city"))
}

fn language() -> Table {
    Table::new("language")
        .column(serial("language", "language_id"))
        .column(Column::new("name", ColumnType::Char { length: 20 }).not_null())
        .column(last_update())
        .relationship(Relationship::one_to_many("films", "film"))
}

fn film() -> Table {
    Table::new("film")
        .column(serial("film", "film_id"))
        .column(text("title", 255).not_null())
        .column(Column::new("description", ColumnType::Text))
        .column(Column::new("release_year", ColumnType::Integer))
        .column(Column::new("language_id", ColumnType::Integer).not_null())
        .column(
            Column::new("rental_duration", ColumnType::SmallInteger)
                .not_null()
                .default_value(ServerDefault::Literal("3".into())),
        )
        .column(
            Column::new("rental_rate", ColumnType::numeric(4, 2))
                .not_null()
                .default_value(ServerDefault::Literal("4.99".into())),
        )
        .column(Column::new("length", ColumnType::SmallInteger))
        .column(
            Column::new("replacement_cost", ColumnType::numeric(5, 2))
                .not_null()
                .default_value(ServerDefault::Literal("19.99".into())),
        )
        .column(Column::new("rating", rating()).default_value(ServerDefault::Literal("'G'".into())))
        .column(last_update())
        .column(Column::new("special_features", ColumnType::TextArray))
        .column(Column::new("fulltext", ColumnType::TsVector).not_null())
        .foreign_key(ForeignKey::new("language_id", "language", "language_id").restrict_cascade())
        .index(Index::new("idx_title", &["title"]))
        .index(Index::new("idx_fk_language_id", &["language_id"]))
        .index(Index::new("film_fulltext_idx", &["fulltext"]))
        .relationship(Relationship::many_to_one("language", "language").eager())
        .relationship(Relationship::many_to_many("categories", "category", "film_category"))
        .relationship(Relationship::many_to_many("actors", "actor", "film_actor"))
}

fn film_actor() -> Table {
    Table::new("film_actor")
        .column(Column::new("actor_id", ColumnType::SmallInteger).primary_key())
        .column(Column::new("film_id", ColumnType::SmallInteger).primary_key())
        .column(last_update())
        .foreign_key(ForeignKey::new("actor_id", "actor", "actor_id").restrict_cascade())
        .foreign_key(ForeignKey::new("film_id", "film", "film_id").restrict_cascade())
        .index(Index::new("idx_fk_film_id", &["film_id"]))
        .relationship(Relationship::many_to_one("actor", "actor"))
        .relationship(Relationship::many_to_one("film", "film"))
}

fn film_category() -> Table {
    Table::new("film_category")
        .column(Column::new("film_id", ColumnType::SmallInteger).primary_key())
        .column(Column::new("category_id", ColumnType::SmallInteger).primary_key())
        .column(last_update())
        .foreign_key(ForeignKey::new("film_id", "film", "film_id").restrict_cascade())
        .foreign_key(ForeignKey::new("category_id", "category", "category_id").restrict_cascade())
        .relationship(Relationship::many_to_one("category", "category"))
        .relationship(Relationship::many_to_one("film", "film"))
}

fn inventory() -> Table {
    Table::new("inventory")
        .column(serial("inventory", "inventory_id"))
        .column(Column::new("film_id", ColumnType::SmallInteger).not_null())
        .column(Column::new("store_id", ColumnType::SmallInteger).not_null())
        .column(last_update())
        .foreign_key(ForeignKey::new("film_id", "film", "film_id").restrict_cascade())
        .index(Index::new("idx_store_id_film_id", &["store_id", "film_id"]))
        .relationship(Relationship::many_to_one("film", "film"))
}

fn customer() -> Table {
    Table::new("customer")
        .column(serial("customer", "customer_id"))
        .column(Column::new("store_id", ColumnType::SmallInteger).not_null())
        .column(text("first_name", 45).not_null())
        .column(text("last_name", 45).not_null())
        .column(text("email", 50))
        .column(Column::new("address_id", ColumnType::SmallInteger).not_null())
        .column(
            Column::new("activebool", ColumnType::Boolean)
                .not_null()
                .default_value(ServerDefault::Literal("true".into())),
        )
        .column(
            Column::new("create_date", ColumnType::Date)
                .not_null()
                .default_value(ServerDefault::CurrentDate),
        )
        .column(Column::new("last_update", ColumnType::Timestamp).default_value(ServerDefault::Now))
        .column(Column::new("active", ColumnType::Integer))
        .foreign_key(ForeignKey::new("address_id", "address", "address_id").restrict_cascade())
        .index(Index::new("idx_fk_store_id", &["store_id"]))
        .index(Index::new("idx_last_name", &["last_name"]))
        .index(Index::new("idx_fk_address_id", &["address_id"]))
        .relationship(Relationship::many_to_one("address", "address"))
}

fn staff() -> Table {
    Table::new("staff")
        .column(serial("staff", "staff_id"))
        .column(text("first_name", 45).not_null())
        .column(text("last_name", 45).not_null())
        .column(Column::new("address_id", ColumnType::SmallInteger).not_null())
        .column(text("email", 50))
        .column(Column::new("store_id", ColumnType::SmallInteger).not_null())
        .column(
            Column::new("active", ColumnType::Boolean)
                .not_null()
                .default_value(ServerDefault::Literal("true".into())),
        )
        .column(text("username", 16).not_null())
        .column(text("password", 40))
        .column(last_update())
        .column(Column::new("picture", ColumnType::Binary))
        .foreign_key(ForeignKey::new("address_id", "address", "address_id").restrict_cascade())
        .relationship(Relationship::many_to_one("address", "address"))
}

fn store() -> Table {
    Table::new("store")
        .column(serial("store", "store_id"))
        .column(
            Column::new("manager_staff_id", ColumnType::SmallInteger)
                .not_null()
                .unique(),
        )
        .column(Column::new("address_id", ColumnType::SmallInteger).not_null())
        .column(last_update())
        .foreign_key(ForeignKey::new("manager_staff_id", "staff", "staff_id").restrict_cascade())
        .foreign_key(ForeignKey::new("address_id", "address", "address_id").restrict_cascade())
        .relationship(Relationship::many_to_one("address", "address"))
        .relationship(Relationship::one_to_one("manager_staff", "staff"))
}

fn rental() -> Table {
    Table::new("rental")
        .column(serial("rental", "rental_id"))
        .column(Column::new("rental_date", ColumnType::Timestamp).not_null())
        .column(Column::new("inventory_id", ColumnType::Integer).not_null())
        .column(Column::new("customer_id", ColumnType::SmallInteger).not_null())
        .column(Column::new("return_date", ColumnType::Timestamp))
        .column(Column::new("staff_id", ColumnType::SmallInteger).not_null())
        .column(last_update())
        .foreign_key(ForeignKey::new("inventory_id", "inventory", "inventory_id").restrict_cascade())
        .foreign_key(ForeignKey::new("customer_id", "customer", "customer_id").restrict_cascade())
        .foreign_key(ForeignKey::new("staff_id", "staff", "staff_id"))
        .index(
            Index::new(
                "idx_unq_rental_rental_date_inventory_id_customer_id",
                &["rental_date", "inventory_id", "customer_id"],
            )
            .unique(),
        )
        .index(Index::new("idx_fk_inventory_id", &["inventory_id"]))
        .relationship(Relationship::many_to_one("customer", "customer"))
        .relationship(Relationship::many_to_one("inventory", "inventory"))
        .relationship(Relationship::many_to_one("staff", "staff"))
}

fn payment() -> Table {
    Table::new("payment")
        .column(serial("payment", "payment_id"))
        .column(Column::new("customer_id", ColumnType::SmallInteger).not_null())
        .column(Column::new("staff_id", ColumnType::SmallInteger).not_null())
        .column(Column::new("rental_id", ColumnType::Integer).not_null())
        .column(Column::new("amount", ColumnType::numeric(5, 2)).not_null())
        .column(Column::new("payment_date", ColumnType::Timestamp).not_null())
        .foreign_key(ForeignKey::new("customer_id", "customer", "customer_id").restrict_cascade())
        .foreign_key(ForeignKey::new("staff_id", "staff", "staff_id").restrict_cascade())
        .foreign_key(
            ForeignKey::new("rental_id", "rental", "rental_id")
                .on_delete(ReferentialAction::SetNull)
                .on_update(ReferentialAction::Cascade),
        )
        .index(Index::new("idx_fk_customer_id", &["customer_id"]))
        .index(Index::new("idx_fk_staff_id", &["staff_id"]))
        .index(Index::new("idx_fk_rental_id", &["rental_id"]))
        .relationship(Relationship::many_to_one("customer", "customer"))
        .relationship(Relationship::many_to_one("rental", "rental"))
        .relationship(Relationship::many_to_one("staff", "staff"))
}

fn customer_list() -> View {
    View::new(
        "customer_list",
        r#"
SELECT cu.customer_id AS id,
    cu.first_name || ' ' || cu.last_name AS name,
    a.address,
    a.postal_code AS "zip code",
    a.phone,
    city.city,
    country.country,
    CASE WHEN cu.activebool THEN 'active' ELSE '' END AS notes,
    cu.store_id AS sid
FROM customer cu
    JOIN address a ON cu.address_id = a.address_id
    JOIN city ON a.city_id = city.city_id
    JOIN country ON city.country_id = country.country_id
"#,
    )
    .column(Column::new("id", ColumnType::Integer))
    .column(Column::new("name", ColumnType::Text))
    .column(text("address", 50))
    .column(text("zip code", 10))
    .column(text("phone", 20))
    .column(text("city", 50))
    .column(text("country", 50))
    .column(Column::new("notes", ColumnType::Text))
    .column(Column::new("sid", ColumnType::SmallInteger))
}

/// Output columns shared by the two film list views.
fn film_list_columns(view: View) -> View {
    view.column(Column::new("fid", ColumnType::Integer))
        .column(text("title", 255))
        .column(Column::new("description", ColumnType::Text))
        .column(text("category", 25))
        .column(Column::new("price", ColumnType::numeric(4, 2)))
        .column(Column::new("length", ColumnType::SmallInteger))
        .column(Column::new("rating", rating()))
        .column(Column::new("actors", ColumnType::Text))
}

fn film_list() -> View {
    film_list_columns(View::new(
        "film_list",
        r#"
SELECT film.film_id AS fid,
    film.title,
    film.description,
    category.name AS category,
    film.rental_rate AS price,
    film.length,
    film.rating,
    group_concat(actor.first_name || ' ' || actor.last_name, ', ' ORDER BY actor.actor_id) AS actors
FROM category
    LEFT JOIN film_category ON category.category_id = film_category.category_id
    LEFT JOIN film ON film_category.film_id = film.film_id
    JOIN film_actor ON film.film_id = film_actor.film_id
    JOIN actor ON film_actor.actor_id = actor.actor_id
GROUP BY film.film_id, film.title, film.description, category.name, film.rental_rate,
    film.length, film.rating
"#,
    ))
}

fn nicer_but_slower_film_list() -> View {
    film_list_columns(View::new(
        "nicer_but_slower_film_list",
        r#"
SELECT film.film_id AS fid,
    film.title,
    film.description,
    category.name AS category,
    film.rental_rate AS price,
    film.length,
    film.rating,
    group_concat(
        upper(substr(actor.first_name, 1, 1)) || lower(substr(actor.first_name, 2))
            || upper(substr(actor.last_name, 1, 1)) || lower(substr(actor.last_name, 2)),
        ', ' ORDER BY actor.actor_id
    ) AS actors
FROM category
    LEFT JOIN film_category ON category.category_id = film_category.category_id
    LEFT JOIN film ON film_category.film_id = film.film_id
    JOIN film_actor ON film.film_id = film_actor.film_id
    JOIN actor ON film_actor.actor_id = actor.actor_id
GROUP BY film.film_id, film.title, film.description, category.name, film.rental_rate,
    film.length, film.rating
"#,
    ))
}

fn sales_by_film_category() -> View {
    View::new(
        "sales_by_film_category",
        r#"
SELECT c.name AS category,
    sum(p.amount) AS total_sales
FROM payment p
    JOIN rental r ON p.rental_id = r.rental_id
    JOIN inventory i ON r.inventory_id = i.inventory_id
    JOIN film f ON i.film_id = f.film_id
    JOIN film_category fc ON f.film_id = fc.film_id
    JOIN category c ON fc.category_id = c.category_id
GROUP BY c.name
ORDER BY sum(p.amount) DESC
"#,
    )
    .column(text("category", 25))
    .column(Column::new("total_sales", ColumnType::Numeric { precision: None, scale: None }))
}

fn sales_by_store() -> View {
    View::new(
        "sales_by_store",
        r#"
SELECT c.city || ',' || cy.country AS store,
    m.first_name || ' ' || m.last_name AS manager,
    sum(p.amount) AS total_sales
FROM payment p
    JOIN rental r ON p.rental_id = r.rental_id
    JOIN inventory i ON r.inventory_id = i.inventory_id
    JOIN store s ON i.store_id = s.store_id
    JOIN address a ON s.address_id = a.address_id
    JOIN city c ON a.city_id = c.city_id
    JOIN country cy ON c.country_id = cy.country_id
    JOIN staff m ON s.manager_staff_id = m.staff_id
GROUP BY cy.country, c.city, s.store_id, m.first_name, m.last_name
ORDER BY cy.country, c.city
"#,
    )
    .column(Column::new("store", ColumnType::Text))
    .column(Column::new("manager", ColumnType::Text))
    .column(Column::new("total_sales", ColumnType::Numeric { precision: None, scale: None }))
}

fn staff_list() -> View {
    View::new(
        "staff_list",
        r#"
SELECT s.staff_id AS id,
    s.first_name || ' ' || s.last_name AS name,
    a.address,
    a.postal_code AS "zip code",
    a.phone,
    city.city,
    country.country,
    s.store_id AS sid
FROM staff s
    JOIN address a ON s.address_id = a.address_id
    JOIN city ON a.city_id = city.city_id
    JOIN country ON city.country_id = country.country_id
"#,
    )
    .column(Column::new("id", ColumnType::Integer))
    .column(Column::new("name", ColumnType::Text))
    .column(text("address", 50))
    .column(text("zip code", 10))
    .column(text("phone", 20))
    .column(text("city", 50))
    .column(text("country", 50))
    .column(Column::new("sid", ColumnType::SmallInteger))
}
