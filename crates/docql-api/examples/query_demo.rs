use docql::logging::LogConfig;
use docql::{
    select_all, DeleteQuery, DocumentEntity, Element, EntityStream, Manager, Result, SelectQuery,
    Session,
};
use std::cell::RefCell;
use std::time::Duration;

/// Prints every call and keeps inserted entities in a list
#[derive(Default)]
struct PrintingManager {
    entities: RefCell<Vec<DocumentEntity>>,
}

impl Manager for PrintingManager {
    fn select<'a>(&'a self, query: &SelectQuery) -> Result<EntityStream<'a>> {
        println!("  select: {}", query);
        let found: Vec<_> = self
            .entities
            .borrow()
            .iter()
            .filter(|e| e.name() == query.name())
            .cloned()
            .collect();
        Ok(Box::new(found.into_iter()))
    }

    fn delete(&self, query: &DeleteQuery) -> Result<()> {
        println!("  delete: {}", query);
        Ok(())
    }

    fn insert(&self, entity: DocumentEntity) -> Result<DocumentEntity> {
        println!("  insert: {:?}", entity);
        self.entities.borrow_mut().push(entity.clone());
        Ok(entity)
    }

    fn insert_with_ttl(&self, entity: DocumentEntity, ttl: Duration) -> Result<DocumentEntity> {
        println!("  insert (ttl {:?}): {:?}", ttl, entity);
        self.entities.borrow_mut().push(entity.clone());
        Ok(entity)
    }

    fn update(&self, entity: DocumentEntity) -> Result<DocumentEntity> {
        println!("  update: {:?}", entity);
        Ok(entity)
    }

    fn count(&self, name: &str) -> Result<u64> {
        Ok(self.entities.borrow().iter().filter(|e| e.name() == name).count() as u64)
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // RUST_LOG=docql_core=trace shows every translated condition
    let _guard = LogConfig::debug().init()?;

    println!("=== docql Query Demo ===\n");
    let session = Session::new(PrintingManager::default());

    println!("1. Immediate queries");
    session
        .query("INSERT God (name = 'Diana', age = 3000, power = 'hunt')")?
        .for_each(drop);
    session
        .query(r#"INSERT God {"name": "Mars", "age": 4000, "power": "war"} 1 day"#)?
        .for_each(drop);
    for god in session.query("FROM God WHERE age > 100 AND NOT power = 'war' ORDER BY name")? {
        println!("  -> {:?}", god.get::<String>("name")?);
    }

    println!("\n2. Prepared statement");
    let mut statement = session.prepare("FROM God WHERE age BETWEEN @low AND @high")?;
    if let Err(err) = statement.result() {
        println!("  before binding: {}", err);
    }
    statement.bind("low", 1000)?.bind("high", 5000)?;
    println!("  matches: {}", statement.result()?.count());

    println!("\n3. Builder");
    let query = select_all()
        .from("God")
        .where_("power")
        .in_(["hunt", "wisdom"])
        .or("age")
        .gte(4000)
        .build()?;
    println!("  built: {}", query);
    println!("  matches: {}", session.select(&query)?.count());

    println!("\n4. Errors");
    for text in ["FROM God WHERE age = @age", "DROP God", "FROM God WHERE age != 1"] {
        if let Err(err) = session.query(text) {
            println!("  {}", err);
        }
    }

    let entity = DocumentEntity::with_elements("God", vec![Element::of("name", "Ada")]);
    session.manager().insert(entity)?;
    println!("\n{} gods stored", session.count("God")?);

    Ok(())
}
