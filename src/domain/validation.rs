//! Local form checks run before any request is sent.

use imanage_api_types::{
    AddActionRequest, AddBoardMemberRequest, AddMemberRequest, CreateIComRequest,
    GeoSearchRequest, UpdateMemberOrderRequest,
};

use super::error::DomainError;

fn require(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_coordinate(field: &str, value: f64) -> Result<(), DomainError> {
    if !value.is_finite() {
        return Err(DomainError::validation(format!(
            "{field} must be a valid coordinate"
        )));
    }
    Ok(())
}

pub fn login(username: &str, password: &str) -> Result<(), DomainError> {
    require("username", username)?;
    require("password", password)
}

pub fn registration(email: &str, password: &str, confirm: &str) -> Result<(), DomainError> {
    require("email", email)?;
    require("password", password)?;
    require("password confirmation", confirm)?;
    if password != confirm {
        return Err(DomainError::validation("passwords do not match"));
    }
    Ok(())
}

pub fn new_icom(request: &CreateIComRequest) -> Result<(), DomainError> {
    require("name", &request.name)
}

pub fn new_member(request: &AddMemberRequest) -> Result<(), DomainError> {
    require("name", &request.name)?;
    require("industry", &request.industry)?;
    require_coordinate("lat", request.lat)?;
    require_coordinate("lng", request.lng)
}

pub fn board_member(request: &AddBoardMemberRequest) -> Result<(), DomainError> {
    require("name", &request.name)?;
    require("role", &request.role)
}

pub fn action(request: &AddActionRequest) -> Result<(), DomainError> {
    require("type", &request.kind)?;
    require("title", &request.title)?;
    require("url", &request.url)
}

pub fn member_order(request: &UpdateMemberOrderRequest) -> Result<(), DomainError> {
    if request.display_order < 1 {
        return Err(DomainError::validation("display order must be at least 1"));
    }
    Ok(())
}

pub fn geo_search(request: &GeoSearchRequest) -> Result<(), DomainError> {
    require_coordinate("lat", request.lat)?;
    require_coordinate("lng", request.lng)?;
    if !(request.radius.is_finite() && request.radius > 0.0) {
        return Err(DomainError::validation("radius must be greater than zero"));
    }
    Ok(())
}

/// Reject empty path identifiers before they collapse a URL segment.
pub fn identifier(entity: &str, id: &str) -> Result<(), DomainError> {
    if id.trim().is_empty() {
        return Err(DomainError::validation(format!("{entity} id is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use imanage_api_types::DistanceUnit;

    use super::*;

    #[test]
    fn blank_credentials_are_rejected() {
        assert_eq!(
            login("  ", "secret"),
            Err(DomainError::validation("username is required"))
        );
        assert!(login("admin", "secret").is_ok());
    }

    #[test]
    fn registration_requires_matching_passwords() {
        assert_eq!(
            registration("a@b.c", "one", "two"),
            Err(DomainError::validation("passwords do not match"))
        );
        assert!(registration("a@b.c", "same", "same").is_ok());
    }

    #[test]
    fn member_needs_name_industry_and_coordinates() {
        let mut request = AddMemberRequest {
            name: "Bakery".into(),
            industry: "food".into(),
            lat: 10.77,
            lng: 106.70,
            ..Default::default()
        };
        assert!(new_member(&request).is_ok());

        request.lng = f64::NAN;
        assert!(new_member(&request).is_err());

        request.lng = 106.70;
        request.industry = String::new();
        assert_eq!(
            new_member(&request),
            Err(DomainError::validation("industry is required"))
        );
    }

    #[test]
    fn order_and_radius_bounds() {
        assert!(member_order(&UpdateMemberOrderRequest { display_order: 0 }).is_err());
        assert!(member_order(&UpdateMemberOrderRequest { display_order: 1 }).is_ok());

        let geo = GeoSearchRequest {
            lat: 10.0,
            lng: 106.0,
            radius: 0.0,
            unit: DistanceUnit::Km,
        };
        assert!(geo_search(&geo).is_err());
        assert!(geo_search(&GeoSearchRequest { radius: 2.5, ..geo }).is_ok());
    }

    #[test]
    fn action_requires_type_title_and_url() {
        let request = AddActionRequest {
            kind: "website".into(),
            title: "Visit".into(),
            url: String::new(),
            ..Default::default()
        };
        assert_eq!(
            action(&request),
            Err(DomainError::validation("url is required"))
        );
    }
}
