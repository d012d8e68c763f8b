//! `destinations` over PostgREST.

use async_trait::async_trait;
use uuid::Uuid;

use super::SupabaseBackend;
use super::query::{Direction, Query};
use crate::domain::ports::{BackendError, DestinationRepository};
use crate::domain::{
    AccessScope, Destination, DestinationDetail, DestinationFilter, NewDestination, Page,
    PageRequest,
};

const DESTINATIONS: &str = "destinations";
const DETAIL_SELECT: &str = "*, activities(*, activity_types(name,icon)), \
     trips(id,start_date,end_date,users(id,name,profile_picture))";

fn filtered(filter: &DestinationFilter) -> Query {
    let mut query = Query::select("*");
    if let Some(country) = filter.country.as_deref() {
        query = query.ilike("country", country);
    }
    if let Some(min_rating) = filter.min_rating {
        query = query.gte("average_rating", min_rating);
    }
    query.order("name", Direction::Asc)
}

#[async_trait]
impl DestinationRepository for SupabaseBackend {
    async fn list(
        &self,
        scope: &AccessScope,
        filter: &DestinationFilter,
        page: PageRequest,
    ) -> Result<Page<Destination>, BackendError> {
        self.client
            .fetch_page(scope, DESTINATIONS, filtered(filter), page)
            .await
    }

    async fn popular(
        &self,
        scope: &AccessScope,
        limit: u32,
    ) -> Result<Vec<Destination>, BackendError> {
        let query = Query::select("*")
            .order("trip_count", Direction::Desc)
            .limit(limit);
        self.client.fetch(scope, DESTINATIONS, &query).await
    }

    async fn search(
        &self,
        scope: &AccessScope,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Destination>, BackendError> {
        let query = Query::select("*")
            .any_ilike(&["name", "country"], query)
            .limit(limit);
        self.client.fetch(scope, DESTINATIONS, &query).await
    }

    async fn find_detail(
        &self,
        scope: &AccessScope,
        id: Uuid,
    ) -> Result<Option<DestinationDetail>, BackendError> {
        let query = Query::select(DETAIL_SELECT).eq("id", id);
        self.client.fetch_one(scope, DESTINATIONS, query).await
    }

    async fn insert(
        &self,
        scope: &AccessScope,
        destination: &NewDestination,
    ) -> Result<Destination, BackendError> {
        self.client
            .insert(scope, DESTINATIONS, destination, "*")
            .await
    }
}
