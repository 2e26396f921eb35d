use tracing::debug;

use crate::error::StoreError;
use crate::model::{Client, Service};
use crate::store::{load_or_default, save, RecordStore, CLIENTS_KEY, SERVICES_KEY};

/// Saved clients and services.
///
/// Clients are keyed by email and services by name; saving an entry
/// with an existing key replaces it in place.
pub struct Catalog<S> {
    store: S,
}

impl<S: RecordStore> Catalog<S> {
    pub fn new(store: S) -> Self {
        Catalog { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clients(&self) -> Vec<Client> {
        load_or_default(&self.store, CLIENTS_KEY)
    }

    pub fn find_client(&self, email: &str) -> Option<Client> {
        let email = email.trim();
        self.clients().into_iter().find(|c| c.email == email)
    }

    /// Add or replace a client. Name and email are required.
    pub fn upsert_client(&self, mut client: Client) -> Result<(), StoreError> {
        client.name = client.name.trim().to_string();
        client.email = client.email.trim().to_string();
        if client.name.is_empty() || client.email.is_empty() {
            return Err(StoreError::Rejected(
                "client name and email are required".to_string(),
            ));
        }
        let mut clients = self.clients();
        debug!(email = %client.email, "client saved");
        match clients.iter_mut().find(|c| c.email == client.email) {
            Some(existing) => *existing = client,
            None => clients.push(client),
        }
        save(&self.store, CLIENTS_KEY, &clients)
    }

    /// Returns whether a client was removed.
    pub fn delete_client(&self, email: &str) -> Result<bool, StoreError> {
        let email = email.trim();
        let mut clients = self.clients();
        let before = clients.len();
        clients.retain(|c| c.email != email);
        if clients.len() == before {
            return Ok(false);
        }
        save(&self.store, CLIENTS_KEY, &clients)?;
        Ok(true)
    }

    pub fn services(&self) -> Vec<Service> {
        load_or_default(&self.store, SERVICES_KEY)
    }

    pub fn find_service(&self, name: &str) -> Option<Service> {
        let name = name.trim();
        self.services().into_iter().find(|s| s.name == name)
    }

    /// Add or replace a service. Name and HSN code are required.
    pub fn upsert_service(&self, mut service: Service) -> Result<(), StoreError> {
        service.name = service.name.trim().to_string();
        service.hsn = service.hsn.trim().to_string();
        if service.name.is_empty() || service.hsn.is_empty() {
            return Err(StoreError::Rejected(
                "service name and HSN code are required".to_string(),
            ));
        }
        let mut services = self.services();
        debug!(name = %service.name, "service saved");
        match services.iter_mut().find(|s| s.name == service.name) {
            Some(existing) => *existing = service,
            None => services.push(service),
        }
        save(&self.store, SERVICES_KEY, &services)
    }

    pub fn delete_service(&self, name: &str) -> Result<bool, StoreError> {
        let name = name.trim();
        let mut services = self.services();
        let before = services.len();
        services.retain(|s| s.name != name);
        if services.len() == before {
            return Ok(false);
        }
        save(&self.store, SERVICES_KEY, &services)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn client(name: &str, email: &str) -> Client {
        Client {
            name: name.into(),
            email: email.into(),
            ..Client::default()
        }
    }

    #[test]
    fn clients_are_keyed_by_email() {
        let catalog = Catalog::new(MemoryStore::new());
        catalog.upsert_client(client("Acme", "ap@acme.test")).unwrap();
        catalog.upsert_client(client("Acme Corp", " ap@acme.test ")).unwrap();
        catalog.upsert_client(client("Globex", "billing@globex.test")).unwrap();

        let clients = catalog.clients();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].name, "Acme Corp");
        assert_eq!(catalog.find_client("billing@globex.test").unwrap().name, "Globex");
    }

    #[test]
    fn client_without_email_is_rejected() {
        let catalog = Catalog::new(MemoryStore::new());
        let err = catalog.upsert_client(client("Acme", "  ")).unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
        assert!(catalog.clients().is_empty());
    }

    #[test]
    fn service_needs_hsn() {
        let catalog = Catalog::new(MemoryStore::new());
        let err = catalog
            .upsert_service(Service {
                name: "Design".into(),
                ..Service::default()
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));

        catalog
            .upsert_service(Service {
                name: "Design".into(),
                hsn: "998391".into(),
                desc: "Brand work".into(),
            })
            .unwrap();
        assert!(catalog.delete_service("Design").unwrap());
        assert!(!catalog.delete_service("Design").unwrap());
    }
}
